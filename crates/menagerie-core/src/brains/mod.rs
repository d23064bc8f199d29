//! Bundled brains.
//!
//! - [`RandomBrain`]: steps in a random direction every turn
//! - [`ForwardBrain`]: keeps going the same way until blocked
//! - [`DarterBrain`]: darts in a random direction every turn
//! - [`FinderBrain`]: grabs adjacent prizes, otherwise wanders
//!
//! Each brain that needs randomness owns a `ChaCha8Rng` seeded by its
//! factory, so runs are reproducible.
//!
//! # Registration
//!
//! Use [`BrainRegistry::with_builtins()`](crate::brain::BrainRegistry::with_builtins)
//! to get a registry with all four registered under lowercase names.

mod darter;
mod finder;
mod forward;
mod random;

pub use darter::DarterBrain;
pub use finder::FinderBrain;
pub use forward::ForwardBrain;
pub use random::RandomBrain;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::arena::Arena;
    use crate::entity::{AnimalComponents, Color, EntityId, EntityInner};
    use crate::grid::{Direction, Location};
    use crate::snapshot::Snapshot;

    /// A 9x9 arena with one animal in the middle.
    pub(crate) fn lone_animal() -> (Arena, EntityId) {
        let mut arena = Arena::new(9, 9);
        let id = arena
            .spawn_at(
                EntityInner::Animal(AnimalComponents::named("subject")),
                Direction::North,
                Color::RED,
                Location::new(4, 4),
            )
            .unwrap();
        (arena, id)
    }

    pub(crate) fn snapshot(arena: &Arena, id: EntityId) -> Snapshot {
        Snapshot::capture(arena, id, 1, 1).unwrap()
    }
}
