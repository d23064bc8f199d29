//! Error types for the simulation engine.
//!
//! [`EngineError`] covers invariant violations (an entity placed twice, a
//! grid record that does not match its entity) and lookup failures. These
//! indicate engine corruption or API misuse and are always propagated, never
//! absorbed. Invalid brain output and exhausted placement searches are not
//! errors: see [`Action::from_code`](crate::brain::Action::from_code) and
//! [`find_prize_location`](crate::layout::find_prize_location).

use thiserror::Error;

use crate::entity::EntityId;
use crate::grid::Location;

/// Failures raised by arena and simulation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No entity with this ID is stored in the arena.
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),

    /// The entity is already on the grid and cannot be placed again.
    #[error("entity {0} is already placed in the grid")]
    AlreadyPlaced(EntityId),

    /// The entity is not on the grid.
    #[error("entity {0} is not placed in the grid")]
    NotPlaced(EntityId),

    /// The grid cell at the entity's stored location holds something else.
    #[error("grid holds {found:?} at {location} but entity {expected} claims that cell")]
    OccupantMismatch {
        /// The location the entity believes it occupies.
        location: Location,
        /// The entity that claims the cell.
        expected: EntityId,
        /// What the grid actually holds there.
        found: Option<EntityId>,
    },

    /// The location lies outside the grid.
    #[error("location {0} is not valid for this grid")]
    InvalidLocation(Location),

    /// No brain factory is registered under this name.
    #[error("no brain registered under the name `{0}`")]
    UnknownBrain(String),

    /// Play modes are 1, 2 or 3.
    #[error("invalid play mode {0} (expected 1, 2 or 3)")]
    InvalidPlayMode(u8),

    /// A round-robin needs at least two competitors.
    #[error("round-robin needs at least {needed} competitors, found {found}")]
    RosterTooSmall {
        /// Minimum roster size.
        needed: usize,
        /// Actual roster size.
        found: usize,
    },
}

/// Convenience alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        let err = EngineError::AlreadyPlaced(EntityId::new(7));
        assert_eq!(err.to_string(), "entity 7 is already placed in the grid");
    }

    #[test]
    fn mismatch_message_includes_location() {
        let err = EngineError::OccupantMismatch {
            location: Location::new(2, 3),
            expected: EntityId::new(1),
            found: None,
        };
        assert!(err.to_string().contains("(2, 3)"));
    }
}
