//! `Snapshot` is the read-only picture of the arena handed to a brain.
//!
//! A snapshot is built fresh for every decision and owns detached copies of
//! the occupants, so nothing a brain does to it can reach the live arena.
//! Trails are left out: to a brain, a trail cell looks empty.
//!
//! # Example
//!
//! ```
//! use menagerie_core::arena::Arena;
//! use menagerie_core::entity::{AnimalComponents, Color, EntityInner};
//! use menagerie_core::grid::{Direction, Location};
//! use menagerie_core::snapshot::Snapshot;
//!
//! let mut arena = Arena::new(21, 21);
//! let me = arena
//!     .spawn_at(
//!         EntityInner::Animal(AnimalComponents::named("me")),
//!         Direction::South,
//!         Color::RED,
//!         Location::new(0, 0),
//!     )
//!     .unwrap();
//!
//! let snapshot = Snapshot::capture(&arena, me, 1, 1).unwrap();
//! assert_eq!(snapshot.location(), Location::new(0, 0));
//! assert!(!snapshot.can_move(Direction::North));
//! assert!(snapshot.can_move(Direction::South));
//! ```

use crate::arena::Arena;
use crate::entity::{Entity, EntityId, EntityTag, PrizeComponents};
use crate::error::{EngineError, EngineResult};
use crate::grid::{Direction, Location};

/// Everything a brain may know when choosing an action.
#[derive(Debug, Clone)]
pub struct Snapshot {
    rows: i32,
    cols: i32,
    /// Row-major copy of the grid with trails removed.
    cells: Vec<Option<Entity>>,
    location: Location,
    heading: Direction,
    score: i64,
    best_score: i64,
    rounds_won: u32,
    move_number: u32,
    round_number: u32,
}

impl Snapshot {
    /// Captures the arena from the point of view of `animal`.
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` if `animal` is not stored or is not an animal
    /// - `NotPlaced` if it is not on the grid
    pub fn capture(
        arena: &Arena,
        animal: EntityId,
        move_number: u32,
        round_number: u32,
    ) -> EngineResult<Self> {
        let me = arena.entity(animal)?;
        let stats = me.as_animal().ok_or(EngineError::UnknownEntity(animal))?;
        let location = me.location().ok_or(EngineError::NotPlaced(animal))?;

        let mut best_score = stats.score;
        let mut cells = Vec::with_capacity(
            usize::try_from(arena.rows() * arena.cols()).unwrap_or_default(),
        );
        for loc in arena.grid().locations() {
            let occupant = arena.entity_at(loc).filter(|e| !e.is_trail());
            if let Some(other) = occupant.and_then(Entity::as_animal) {
                best_score = best_score.max(other.score);
            }
            cells.push(occupant.cloned());
        }

        Ok(Self {
            rows: arena.rows(),
            cols: arena.cols(),
            cells,
            location,
            heading: me.heading(),
            score: stats.score,
            best_score,
            rounds_won: stats.record.rounds_won,
            move_number,
            round_number,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.cols
    }

    /// The deciding animal's cell.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// The deciding animal's current facing.
    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    /// The deciding animal's score this round.
    #[must_use]
    pub const fn score(&self) -> i64 {
        self.score
    }

    /// Highest score among all animals on the grid.
    #[must_use]
    pub const fn best_score(&self) -> i64 {
        self.best_score
    }

    /// Rounds the deciding animal has won in the current match.
    #[must_use]
    pub const fn rounds_won(&self) -> u32 {
        self.rounds_won
    }

    /// Move number within the round (starts at 1).
    #[must_use]
    pub const fn move_number(&self) -> u32 {
        self.move_number
    }

    /// Round number within the match (starts at 1).
    #[must_use]
    pub const fn round_number(&self) -> u32 {
        self.round_number
    }

    /// Returns true if `loc` lies inside the grid.
    #[must_use]
    pub const fn is_valid(&self, loc: Location) -> bool {
        loc.row >= 0 && loc.row < self.rows && loc.col >= 0 && loc.col < self.cols
    }

    /// The occupant of `loc`, if any. Trails read as empty.
    #[must_use]
    pub fn get(&self, loc: Location) -> Option<&Entity> {
        if !self.is_valid(loc) {
            return None;
        }
        let index = usize::try_from(loc.row * self.cols + loc.col).ok()?;
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Kind of the occupant of `loc`.
    #[must_use]
    pub fn tag_at(&self, loc: Location) -> Option<EntityTag> {
        self.get(loc).map(Entity::tag)
    }

    /// Returns true if one step in `direction` would succeed: the cell is on
    /// the grid and is empty or holds a prize.
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        let next = self.location.adjacent(direction);
        self.is_valid(next) && matches!(self.tag_at(next), None | Some(EntityTag::Prize))
    }

    /// Returns true if the cell one step in `direction` holds a prize.
    #[must_use]
    pub fn is_prize_toward(&self, direction: Direction) -> bool {
        self.tag_at(self.location.adjacent(direction)) == Some(EntityTag::Prize)
    }

    /// Every prize on the grid, row-major.
    #[must_use]
    pub fn prizes(&self) -> Vec<(Location, PrizeComponents)> {
        self.cells
            .iter()
            .flatten()
            .filter_map(|e| Some((e.location()?, *e.as_prize()?)))
            .collect()
    }
}
