//! Brain trait, actions and the brain registry.
//!
//! A [`Brain`] decides what its animal does each tick. It receives an owned
//! [`Snapshot`] and returns an [`Action`]; it never touches the arena.
//!
//! Brains are created through a [`BrainRegistry`], which maps names to
//! factories taking a seed. The engine derives that seed from its own RNG,
//! so a simulation seed determines every brain's randomness too.
//!
//! # Example
//!
//! ```
//! use menagerie_core::brain::{Action, Brain, BrainRegistry};
//! use menagerie_core::snapshot::Snapshot;
//!
//! struct Lazy;
//!
//! impl Brain for Lazy {
//!     fn name(&self) -> &str {
//!         "Lazy"
//!     }
//!     fn decide(&mut self, _snapshot: &Snapshot) -> Action {
//!         Action::Rest
//!     }
//! }
//!
//! let mut registry = BrainRegistry::new();
//! registry.register("lazy", |_seed| Box::new(Lazy));
//!
//! let brain = registry.create("lazy", 7).unwrap();
//! assert_eq!(brain.name(), "Lazy");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::brains::{DarterBrain, FinderBrain, ForwardBrain, RandomBrain};
use crate::entity::Color;
use crate::error::{EngineError, EngineResult};
use crate::grid::{Direction, RIGHT_ANGLE};
use crate::snapshot::Snapshot;

// =============================================================================
// Action
// =============================================================================

const CODE_BAND: i32 = 1000;
const DART_BAND: i32 = 1;
const BLOCK_BAND: i32 = 2;
const WALL_BAND: i32 = 3;
const TURN_BAND: i32 = 4;

/// What an animal does on its turn.
///
/// Every variant except `Rest` carries a direction, and the animal faces that
/// direction before the action is resolved, even if the action then fails.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Do nothing and keep the current facing.
    Rest,
    /// Face a direction without moving.
    Turn(Direction),
    /// Step one cell.
    Move(Direction),
    /// Step repeatedly until the next cell cannot be entered.
    Dart(Direction),
    /// Put a permanent block in the facing cell.
    BuildBlock(Direction),
    /// Put a line of temporary blocks across the facing cell.
    BuildWall(Direction),
}

impl Action {
    /// Decodes an integer action code.
    ///
    /// The thousands band selects the action (0 move, 1 dart, 2 block,
    /// 3 wall) and the remainder is the heading in degrees. Codes that cannot
    /// be acted on are absorbed rather than rejected:
    ///
    /// - a negative code turns toward its heading (taken modulo 1000 and
    ///   snapped down like any other) and rests;
    /// - a heading that is not a multiple of 90 turns toward the snapped-down
    ///   heading and rests;
    /// - codes of 4000 and above turn and rest.
    ///
    /// ```
    /// use menagerie_core::brain::Action;
    /// use menagerie_core::grid::Direction;
    ///
    /// assert_eq!(Action::from_code(90), Action::Move(Direction::East));
    /// assert_eq!(Action::from_code(1180), Action::Dart(Direction::South));
    /// assert_eq!(Action::from_code(45), Action::Turn(Direction::North));
    /// assert_eq!(Action::from_code(-1), Action::Turn(Direction::West));
    /// ```
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        if code < 0 {
            return Self::Turn(Direction::from_degrees(code % CODE_BAND));
        }
        let degrees = code % CODE_BAND;
        let direction = Direction::from_degrees(degrees);
        if degrees % RIGHT_ANGLE != 0 {
            return Self::Turn(direction);
        }
        match code / CODE_BAND {
            0 => Self::Move(direction),
            DART_BAND => Self::Dart(direction),
            BLOCK_BAND => Self::BuildBlock(direction),
            WALL_BAND => Self::BuildWall(direction),
            _ => Self::Turn(direction),
        }
    }

    /// Encodes the action as an integer code accepted by
    /// [`from_code`](Self::from_code).
    ///
    /// Every code faces some heading, so `Rest` has none.
    #[must_use]
    pub const fn code(self) -> Option<i32> {
        let code = match self {
            Self::Rest => return None,
            Self::Move(d) => d.degrees(),
            Self::Dart(d) => DART_BAND * CODE_BAND + d.degrees(),
            Self::BuildBlock(d) => BLOCK_BAND * CODE_BAND + d.degrees(),
            Self::BuildWall(d) => WALL_BAND * CODE_BAND + d.degrees(),
            Self::Turn(d) => TURN_BAND * CODE_BAND + d.degrees(),
        };
        Some(code)
    }

    /// The direction the animal faces while performing this action.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Rest => None,
            Self::Turn(d)
            | Self::Move(d)
            | Self::Dart(d)
            | Self::BuildBlock(d)
            | Self::BuildWall(d) => Some(d),
        }
    }
}

impl From<i32> for Action {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest => write!(f, "rest"),
            Self::Turn(d) => write!(f, "turn {d}"),
            Self::Move(d) => write!(f, "move {d}"),
            Self::Dart(d) => write!(f, "dart {d}"),
            Self::BuildBlock(d) => write!(f, "block {d}"),
            Self::BuildWall(d) => write!(f, "wall {d}"),
        }
    }
}

// =============================================================================
// Brain
// =============================================================================

/// Decision-maker for one animal.
///
/// Brains own whatever state they need between turns. They are `Send` so a
/// whole simulation can be moved to a worker thread; the engine itself only
/// ever calls them from one thread.
pub trait Brain: Send {
    /// Display name, copied to the animal on enrolment.
    fn name(&self) -> &str;

    /// Colour the animal should wear, if the brain cares.
    fn preferred_color(&self) -> Option<Color> {
        None
    }

    /// Chooses this turn's action.
    fn decide(&mut self, snapshot: &Snapshot) -> Action;

    /// Called at the start of every round after the animal is placed.
    fn on_round_start(&mut self) {}
}

// =============================================================================
// BrainRegistry
// =============================================================================

/// Factory producing a brain from a seed.
pub type BrainFactory = Arc<dyn Fn(u64) -> Box<dyn Brain> + Send + Sync>;

/// Named brain factories.
///
/// Names are kept sorted, so [`names`](Self::names) is stable.
#[derive(Clone, Default)]
pub struct BrainRegistry {
    factories: BTreeMap<String, BrainFactory>,
}

impl fmt::Debug for BrainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrainRegistry")
            .field("names", &self.names())
            .finish()
    }
}

impl BrainRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Creates a registry holding the bundled brains: `darter`, `finder`,
    /// `forward` and `random`.
    ///
    /// ```
    /// use menagerie_core::brain::BrainRegistry;
    ///
    /// let registry = BrainRegistry::with_builtins();
    /// assert_eq!(registry.names(), vec!["darter", "finder", "forward", "random"]);
    /// ```
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("random", |seed| Box::new(RandomBrain::new(seed)));
        registry.register("forward", |seed| Box::new(ForwardBrain::new(seed)));
        registry.register("darter", |seed| Box::new(DarterBrain::new(seed)));
        registry.register("finder", |seed| Box::new(FinderBrain::new(seed)));
        registry
    }

    /// Registers a factory, replacing any previous one with the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(u64) -> Box<dyn Brain> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Builds the brain registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownBrain`] if nothing is registered under
    /// `name`.
    pub fn create(&self, name: &str, seed: u64) -> EngineResult<Box<dyn Brain>> {
        self.factories
            .get(name)
            .map(|factory| factory(seed))
            .ok_or_else(|| EngineError::UnknownBrain(name.to_string()))
    }

    /// Returns true if a factory is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
