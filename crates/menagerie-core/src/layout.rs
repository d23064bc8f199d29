//! Arena layouts and placement policies.
//!
//! Three challenge modes decide how a round starts:
//!
//! | mode          | blocks                         | periodic prizes |
//! |---------------|--------------------------------|-----------------|
//! | `SinglePrize` | none                           | no              |
//! | `PlusSign`    | a plus through the centre      | no              |
//! | `Standard`    | side rooms and a centre block  | yes             |
//!
//! Every mode starts with one super prize in a random slot. Blocks can be
//! toggled independently of the mode.
//!
//! The free functions implement the random placement searches the engine
//! uses for prizes and starting cells. A search that finds nothing returns
//! `None`; that is expected on a crowded grid and is never an error.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::arena::Arena;
use crate::config::EngineConfig;
use crate::entity::{BlockComponents, Color, EntityId, EntityInner, PrizeComponents, PrizeKind};
use crate::error::{EngineError, EngineResult};
use crate::grid::{Direction, Location};

/// Cells in each arm of the plus-sign layout, not counting the centre.
const PLUS_ARM_LENGTH: i32 = 5;

/// Depth of the side-room walls in the standard layout.
const ROOM_WALL_DEPTH: i32 = 4;

// =============================================================================
// ChallengeMode
// =============================================================================

/// Arena rules for a round.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ChallengeMode {
    /// No blocks, no periodic prizes: just the opening super prize.
    SinglePrize = 1,
    /// A plus sign of blocks through the centre.
    PlusSign = 2,
    /// Standard rooms with periodic prizes.
    Standard = 3,
}

impl ChallengeMode {
    /// The mode's number (1, 2 or 3).
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    /// Returns true if periodic prizes spawn in this mode.
    #[must_use]
    pub const fn spawns_prizes(self) -> bool {
        matches!(self, Self::Standard)
    }
}

impl TryFrom<u8> for ChallengeMode {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::SinglePrize),
            2 => Ok(Self::PlusSign),
            3 => Ok(Self::Standard),
            other => Err(EngineError::InvalidPlayMode(other)),
        }
    }
}

// =============================================================================
// ArenaLayout
// =============================================================================

/// Current mode plus the independent block toggle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ArenaLayout {
    mode: ChallengeMode,
    with_blocks: bool,
}

impl ArenaLayout {
    /// Creates a layout; standard blocks are on only for `Standard`.
    #[must_use]
    pub const fn new(mode: ChallengeMode) -> Self {
        Self {
            mode,
            with_blocks: matches!(mode, ChallengeMode::Standard),
        }
    }

    /// The current mode.
    #[must_use]
    pub const fn mode(&self) -> ChallengeMode {
        self.mode
    }

    /// Whether the standard blocks will be laid.
    #[must_use]
    pub const fn with_blocks(&self) -> bool {
        self.with_blocks
    }

    /// Switches mode. The block toggle follows the mode.
    pub fn set_mode(&mut self, mode: ChallengeMode) {
        self.mode = mode;
        self.with_blocks = mode >= ChallengeMode::Standard;
    }

    /// Flips whether the standard blocks are laid.
    pub fn toggle_blocks(&mut self) {
        self.with_blocks = !self.with_blocks;
    }

    /// Lays out blocks and the opening super prize on an empty grid.
    ///
    /// Layout blocks last `layout_block_lifetime` ticks. Returns the super
    /// prize's ID.
    ///
    /// # Errors
    ///
    /// Propagates arena errors; with a valid configuration there are none.
    pub fn initialize<R: Rng + ?Sized>(
        &self,
        arena: &mut Arena,
        rng: &mut R,
        config: &EngineConfig,
    ) -> EngineResult<EntityId> {
        let (rows, cols) = (arena.rows(), arena.cols());
        let lifetime = config.layout_block_lifetime;
        if self.with_blocks {
            place_blocks(arena, standard_blocks(rows, cols), lifetime)?;
        }
        if self.mode == ChallengeMode::PlusSign {
            place_blocks(arena, plus_sign_blocks(rows, cols), lifetime)?;
        }

        let slots = super_prize_slots(rows, cols);
        let slot = slots[rng.gen_range(0..slots.len())];
        place_prize(arena, PrizeKind::Super, config.super_prize_value, slot)
    }
}

impl Default for ArenaLayout {
    fn default() -> Self {
        Self::new(ChallengeMode::Standard)
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Cells of the standard layout: a centre block, four container blocks and
/// the walls of four side rooms. Some cells repeat on small grids.
#[must_use]
pub fn standard_blocks(rows: i32, cols: i32) -> Vec<Location> {
    let (cr, cc) = (rows / 2, cols / 2);
    let mut cells = vec![
        Location::new(cr, cc),
        Location::new(3, cc),
        Location::new(rows - 4, cc),
        Location::new(cr, 3),
        Location::new(cr, cols - 4),
    ];
    for off in 0..ROOM_WALL_DEPTH {
        cells.extend([
            Location::new(off, cc - 2),
            Location::new(off, cc + 2),
            Location::new(rows - off - 1, cc - 2),
            Location::new(rows - off - 1, cc + 2),
            Location::new(cr - 2, off),
            Location::new(cr + 2, off),
            Location::new(cr - 2, cols - off - 1),
            Location::new(cr + 2, cols - off - 1),
        ]);
    }
    cells
}

/// Cells of the plus-sign layout: the centre and five cells along each arm.
#[must_use]
pub fn plus_sign_blocks(rows: i32, cols: i32) -> Vec<Location> {
    let center = Location::new(rows / 2, cols / 2);
    let mut cells = vec![center];
    for dir in Direction::ALL {
        let mut loc = center;
        for _ in 0..PLUS_ARM_LENGTH {
            loc = loc.adjacent(dir);
            cells.push(loc);
        }
    }
    cells
}

/// The four fixed super-prize slots, one inside each side room.
#[must_use]
pub const fn super_prize_slots(rows: i32, cols: i32) -> [Location; 4] {
    let (cr, cc) = (rows / 2, cols / 2);
    [
        Location::new(cr, 1),
        Location::new(cr, cols - 2),
        Location::new(1, cc),
        Location::new(rows - 2, cc),
    ]
}

/// Display colour for a prize.
#[must_use]
pub const fn prize_color(kind: PrizeKind) -> Color {
    match kind {
        PrizeKind::Super => Color::RED,
        PrizeKind::Standard | PrizeKind::Built => Color::GOLD,
    }
}

/// Lays blocks lasting `lifetime` ticks on the valid cells of `cells`.
fn place_blocks(arena: &mut Arena, cells: Vec<Location>, lifetime: u32) -> EngineResult<()> {
    for loc in cells {
        if !arena.is_valid(loc) {
            continue;
        }
        arena.spawn_at(
            EntityInner::Block(BlockComponents::temporary(lifetime)),
            Direction::North,
            Color::GRAY,
            loc,
        )?;
    }
    Ok(())
}

/// Creates a prize at `loc`, replacing whatever is there.
///
/// # Errors
///
/// `InvalidLocation` if `loc` is off the grid.
pub fn place_prize(
    arena: &mut Arena,
    kind: PrizeKind,
    value: i64,
    loc: Location,
) -> EngineResult<EntityId> {
    arena.spawn_at(
        EntityInner::Prize(PrizeComponents::new(kind, value)),
        Direction::North,
        prize_color(kind),
        loc,
    )
}

// =============================================================================
// Placement searches
// =============================================================================

/// Picks a random cell for a prize.
///
/// Tries up to `placement_attempts` uniformly random cells and accepts the
/// first that is empty or holds only a trail, is not within
/// `prize_proximity` of any placed animal, and is further than
/// `super_slot_clearance` from every super-prize slot.
pub fn find_prize_location<R: Rng + ?Sized>(
    arena: &Arena,
    rng: &mut R,
    config: &EngineConfig,
) -> Option<Location> {
    let (rows, cols) = (arena.rows(), arena.cols());
    let animals = arena.animal_locations();
    let slots = super_prize_slots(rows, cols);
    let proximity = config.prize_proximity * config.prize_proximity;
    let clearance = config.super_slot_clearance * config.super_slot_clearance;

    for _ in 0..config.placement_attempts {
        let loc = Location::new(rng.gen_range(0..rows), rng.gen_range(0..cols));
        let free = arena.entity_at(loc).map_or(true, |e| e.is_trail());
        let crowded = animals.iter().any(|&a| loc.distance_squared(a) < proximity);
        let in_room = slots.iter().any(|&s| loc.distance_squared(s) <= clearance);
        if free && !crowded && !in_room {
            return Some(loc);
        }
    }

    debug!(
        attempts = config.placement_attempts,
        "no prize location found"
    );
    None
}

/// Picks a random super-prize slot that is empty or holds only a trail.
pub fn find_super_slot<R: Rng + ?Sized>(
    arena: &Arena,
    rng: &mut R,
    config: &EngineConfig,
) -> Option<Location> {
    let slots = super_prize_slots(arena.rows(), arena.cols());
    for _ in 0..config.super_slot_attempts {
        let loc = slots[rng.gen_range(0..slots.len())];
        if arena.entity_at(loc).map_or(true, |e| e.is_trail()) {
            return Some(loc);
        }
    }
    debug!(
        attempts = config.super_slot_attempts,
        "no free super prize slot"
    );
    None
}

/// Picks a random empty starting cell near the centre.
///
/// Looks in the 3×3 centre first, then the 5×5 centre, then anywhere.
pub fn find_start_location<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Option<Location> {
    let center = Location::new(arena.rows() / 2, arena.cols() / 2);
    let empty_within = |radius: i32| -> Vec<Location> {
        (center.row - radius..=center.row + radius)
            .flat_map(|row| {
                (center.col - radius..=center.col + radius).map(move |col| Location::new(row, col))
            })
            .filter(|&loc| arena.is_valid(loc) && arena.id_at(loc).is_none())
            .collect()
    };

    let mut candidates = empty_within(1);
    if candidates.is_empty() {
        candidates = empty_within(2);
    }
    if candidates.is_empty() {
        candidates = arena
            .grid()
            .locations()
            .filter(|&loc| arena.id_at(loc).is_none())
            .collect();
    }
    candidates.choose(rng).copied()
}

/// A uniformly random heading.
pub fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
}
