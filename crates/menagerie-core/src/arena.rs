//! Arena: entity storage plus the occupancy grid.
//!
//! The Arena owns every entity and the [`Grid`] that records where they sit.
//! It is the only code allowed to change placement, so the two views can be
//! kept in agreement:
//!
//! - an entity's `location` is `Some(loc)` exactly when the grid maps `loc`
//!   to that entity's ID;
//! - each grid cell holds at most one entity.
//!
//! # Lifetimes of occupants
//!
//! Animals persist in storage between rounds and matches and are merely
//! unplaced when they leave the grid. Blocks, prizes and trails exist only
//! while placed: evicting or removing one discards it.
//!
//! # Determinism
//!
//! Entities are stored in a `BTreeMap` keyed by monotonically assigned IDs,
//! and every listing of grid cells is row-major, so iteration order never
//! depends on hashing.
//!
//! # Example
//!
//! ```
//! use menagerie_core::arena::Arena;
//! use menagerie_core::entity::{AnimalComponents, Color, EntityInner};
//! use menagerie_core::grid::{Direction, Location};
//!
//! let mut arena = Arena::new(21, 21);
//! let id = arena.spawn(
//!     EntityInner::Animal(AnimalComponents::named("finder")),
//!     Direction::East,
//!     Color::RED,
//! );
//!
//! arena.place(id, Location::new(10, 10)).unwrap();
//! arena.move_to(id, Location::new(10, 11)).unwrap();
//!
//! assert_eq!(arena.id_at(Location::new(10, 11)), Some(id));
//! assert!(arena.verify_consistency().is_ok());
//! ```

use std::collections::BTreeMap;

use crate::entity::{Color, Entity, EntityId, EntityInner, EntityTag};
use crate::error::{EngineError, EngineResult};
use crate::grid::{Direction, Grid, Location};

/// Container for all entities and the grid they occupy.
#[derive(Debug, Clone)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Location to occupant mapping.
    grid: Grid,
}

impl Arena {
    /// Creates an empty arena over a `rows × cols` grid.
    #[must_use]
    pub fn new(rows: i32, cols: i32) -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            grid: Grid::new(rows, cols),
        }
    }

    // =========================================================================
    // Storage
    // =========================================================================

    /// Creates an unplaced entity and returns its ID.
    ///
    /// # Arguments
    ///
    /// * `inner` - Kind-specific components; the tag is derived from these
    /// * `heading` - Initial facing
    /// * `color` - Display colour
    pub fn spawn(&mut self, inner: EntityInner, heading: Direction, color: Color) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        let mut entity = Entity::new(id, inner);
        entity.set_heading(heading);
        entity.set_color(color);

        self.entities.insert(id, entity);
        id
    }

    /// Spawns an entity and places it at `loc` in one step.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLocation`] if `loc` is off the grid. The
    /// freshly spawned entity is discarded in that case.
    pub fn spawn_at(
        &mut self,
        inner: EntityInner,
        heading: Direction,
        color: Color,
        loc: Location,
    ) -> EngineResult<EntityId> {
        let id = self.spawn(inner, heading, color);
        if let Err(err) = self.place(id, loc) {
            self.entities.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    ///
    /// Placement cannot be changed through this reference; use
    /// [`place`](Self::place), [`remove`](Self::remove) and
    /// [`move_to`](Self::move_to).
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Looks up an entity, failing with [`EngineError::UnknownEntity`].
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if no entity has this ID.
    pub fn entity(&self, id: EntityId) -> EngineResult<&Entity> {
        self.entities.get(&id).ok_or(EngineError::UnknownEntity(id))
    }

    /// Mutable counterpart of [`entity`](Self::entity).
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if no entity has this ID.
    pub fn entity_mut(&mut self, id: EntityId) -> EngineResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(EngineError::UnknownEntity(id))
    }

    /// Returns true if an entity with this ID is stored.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entities in ID order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// IDs of every stored animal, placed or not, in ID order.
    #[must_use]
    pub fn animal_ids(&self) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.is_animal())
            .map(Entity::id)
            .collect()
    }

    /// Number of stored entities, placed or not.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Deletes an entity from storage, taking it off the grid first if needed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` for an unknown ID, or `OccupantMismatch` if a
    /// placed entity's cell holds something else.
    pub fn despawn(&mut self, id: EntityId) -> EngineResult<Entity> {
        if self.entity(id)?.is_placed() {
            let loc = self.checked_location(id)?;
            self.grid.remove(loc);
        }
        let mut entity = self
            .entities
            .remove(&id)
            .ok_or(EngineError::UnknownEntity(id))?;
        entity.set_location(None);
        Ok(entity)
    }

    // =========================================================================
    // Grid queries
    // =========================================================================

    /// The occupancy grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.grid.rows()
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> i32 {
        self.grid.cols()
    }

    /// Returns true if `loc` lies inside the grid.
    #[must_use]
    pub const fn is_valid(&self, loc: Location) -> bool {
        self.grid.is_valid(loc)
    }

    /// ID of the occupant of `loc`.
    #[must_use]
    pub fn id_at(&self, loc: Location) -> Option<EntityId> {
        self.grid.get(loc)
    }

    /// The occupant of `loc`.
    #[must_use]
    pub fn entity_at(&self, loc: Location) -> Option<&Entity> {
        self.grid.get(loc).and_then(|id| self.entities.get(&id))
    }

    /// Kind of the occupant of `loc`.
    #[must_use]
    pub fn tag_at(&self, loc: Location) -> Option<EntityTag> {
        self.entity_at(loc).map(Entity::tag)
    }

    /// Returns true if `loc` is on the grid and not occupied by an animal or
    /// block.
    #[must_use]
    pub fn is_enterable(&self, loc: Location) -> bool {
        self.is_valid(loc) && !self.tag_at(loc).is_some_and(EntityTag::is_solid)
    }

    /// Placed entities paired with their cells, in row-major order.
    #[must_use]
    pub fn occupants(&self) -> Vec<(Location, &Entity)> {
        self.grid
            .occupied_locations()
            .into_iter()
            .filter_map(|loc| self.entity_at(loc).map(|e| (loc, e)))
            .collect()
    }

    /// IDs of placed entities in row-major order of their cells.
    #[must_use]
    pub fn placed_ids(&self) -> Vec<EntityId> {
        self.grid
            .occupied_locations()
            .into_iter()
            .filter_map(|loc| self.grid.get(loc))
            .collect()
    }

    /// Locations of placed animals in row-major order.
    #[must_use]
    pub fn animal_locations(&self) -> Vec<Location> {
        self.occupants()
            .into_iter()
            .filter(|(_, e)| e.is_animal())
            .map(|(loc, _)| loc)
            .collect()
    }

    // =========================================================================
    // Placement
    // =========================================================================

    /// Puts an unplaced entity on the grid, evicting whatever holds `loc`.
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` if `id` is not stored
    /// - `AlreadyPlaced` if the entity is already on the grid
    /// - `InvalidLocation` if `loc` is off the grid
    pub fn place(&mut self, id: EntityId, loc: Location) -> EngineResult<()> {
        if self.entity(id)?.is_placed() {
            return Err(EngineError::AlreadyPlaced(id));
        }
        if !self.grid.is_valid(loc) {
            return Err(EngineError::InvalidLocation(loc));
        }

        self.evict(loc);
        self.grid.put(loc, id);
        self.entity_mut(id)?.set_location(Some(loc));
        Ok(())
    }

    /// Takes an entity off the grid.
    ///
    /// Animals stay in storage, unplaced. Anything else is discarded.
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` if `id` is not stored
    /// - `NotPlaced` if the entity is not on the grid
    /// - `OccupantMismatch` if the grid holds something else at the entity's
    ///   recorded location
    pub fn remove(&mut self, id: EntityId) -> EngineResult<()> {
        let loc = self.checked_location(id)?;
        self.grid.remove(loc);
        self.release(id);
        Ok(())
    }

    /// Relocates a placed entity to `loc`, evicting whatever holds it.
    ///
    /// Moving to the current location does nothing.
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` if `id` is not stored
    /// - `NotPlaced` if the entity is not on the grid
    /// - `OccupantMismatch` if the grid disagrees with the entity
    /// - `InvalidLocation` if `loc` is off the grid
    pub fn move_to(&mut self, id: EntityId, loc: Location) -> EngineResult<()> {
        let from = self.checked_location(id)?;
        if !self.grid.is_valid(loc) {
            return Err(EngineError::InvalidLocation(loc));
        }
        if from == loc {
            return Ok(());
        }

        self.evict(loc);
        self.grid.remove(from);
        self.grid.put(loc, id);
        self.entity_mut(id)?.set_location(Some(loc));
        Ok(())
    }

    /// Turns an entity.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if `id` is not stored.
    pub fn set_heading(&mut self, id: EntityId, heading: Direction) -> EngineResult<()> {
        self.entity_mut(id)?.set_heading(heading);
        Ok(())
    }

    /// Empties the grid: animals are unplaced, everything else is discarded.
    pub fn clear_grid(&mut self) {
        for loc in self.grid.occupied_locations() {
            self.evict(loc);
        }
    }

    /// Checks both directions of the grid/entity relation.
    ///
    /// # Errors
    ///
    /// Returns the first violation found:
    /// - an entity whose recorded cell holds something else
    ///   (`OccupantMismatch`)
    /// - a grid cell naming an entity that is not stored (`UnknownEntity`)
    /// - a grid cell naming an entity that records no location (`NotPlaced`)
    pub fn verify_consistency(&self) -> EngineResult<()> {
        for entity in self.entities.values() {
            if let Some(loc) = entity.location() {
                let found = self.grid.get(loc);
                if found != Some(entity.id()) {
                    return Err(EngineError::OccupantMismatch {
                        location: loc,
                        expected: entity.id(),
                        found,
                    });
                }
            }
        }

        for loc in self.grid.occupied_locations() {
            let Some(id) = self.grid.get(loc) else {
                continue;
            };
            let entity = self.entity(id)?;
            match entity.location() {
                None => return Err(EngineError::NotPlaced(id)),
                Some(recorded) if recorded != loc => {
                    return Err(EngineError::OccupantMismatch {
                        location: loc,
                        expected: id,
                        found: Some(id),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// The entity's location after confirming the grid agrees with it.
    fn checked_location(&self, id: EntityId) -> EngineResult<Location> {
        let loc = self.entity(id)?.location().ok_or(EngineError::NotPlaced(id))?;
        let found = self.grid.get(loc);
        if found != Some(id) {
            return Err(EngineError::OccupantMismatch {
                location: loc,
                expected: id,
                found,
            });
        }
        Ok(loc)
    }

    /// Force-removes whatever holds `loc`.
    fn evict(&mut self, loc: Location) {
        if let Some(occupant) = self.grid.remove(loc) {
            self.release(occupant);
        }
    }

    /// Marks an entity as off the grid; non-animals are dropped from storage.
    fn release(&mut self, id: EntityId) {
        let keep = match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.set_location(None);
                entity.is_animal()
            }
            None => return,
        };
        if !keep {
            self.entities.remove(&id);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AnimalComponents, BlockComponents, PrizeComponents, PrizeKind, TrailComponents};

    fn animal(arena: &mut Arena, name: &str) -> EntityId {
        arena.spawn(
            EntityInner::Animal(AnimalComponents::named(name)),
            Direction::North,
            Color::RED,
        )
    }

    fn block_at(arena: &mut Arena, loc: Location) -> EntityId {
        arena
            .spawn_at(
                EntityInner::Block(BlockComponents::permanent()),
                Direction::North,
                Color::GRAY,
                loc,
            )
            .unwrap()
    }

    fn prize_at(arena: &mut Arena, loc: Location) -> EntityId {
        arena
            .spawn_at(
                EntityInner::Prize(PrizeComponents::new(PrizeKind::Standard, 100)),
                Direction::North,
                Color::GOLD,
                loc,
            )
            .unwrap()
    }

    mod placement_tests {
        use super::*;

        #[test]
        fn spawn_assigns_sequential_ids() {
            let mut arena = Arena::new(5, 5);
            let a = animal(&mut arena, "a");
            let b = animal(&mut arena, "b");
            assert_eq!(a, EntityId::new(0));
            assert_eq!(b, EntityId::new(1));
            assert!(!arena.get(a).unwrap().is_placed());
        }

        #[test]
        fn place_records_both_sides() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            let loc = Location::new(2, 3);

            arena.place(id, loc).unwrap();

            assert_eq!(arena.id_at(loc), Some(id));
            assert_eq!(arena.get(id).unwrap().location(), Some(loc));
            arena.verify_consistency().unwrap();
        }

        #[test]
        fn place_twice_fails() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            arena.place(id, Location::new(0, 0)).unwrap();

            let err = arena.place(id, Location::new(1, 1)).unwrap_err();
            assert_eq!(err, EngineError::AlreadyPlaced(id));
        }

        #[test]
        fn place_off_grid_fails() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            let loc = Location::new(5, 0);
            assert_eq!(
                arena.place(id, loc).unwrap_err(),
                EngineError::InvalidLocation(loc)
            );
            assert!(!arena.get(id).unwrap().is_placed());
        }

        #[test]
        fn spawn_at_off_grid_discards_entity() {
            let mut arena = Arena::new(5, 5);
            let result = arena.spawn_at(
                EntityInner::Trail(TrailComponents),
                Direction::North,
                Color::RED,
                Location::new(-1, 0),
            );
            assert!(result.is_err());
            assert_eq!(arena.entity_count(), 0);
        }

        #[test]
        fn place_evicts_prize() {
            let mut arena = Arena::new(5, 5);
            let loc = Location::new(1, 1);
            let prize = prize_at(&mut arena, loc);
            let id = animal(&mut arena, "a");

            arena.place(id, loc).unwrap();

            assert!(arena.get(prize).is_none());
            assert_eq!(arena.id_at(loc), Some(id));
            arena.verify_consistency().unwrap();
        }

        #[test]
        fn place_evicts_animal_without_discarding_it() {
            let mut arena = Arena::new(5, 5);
            let loc = Location::new(1, 1);
            let first = animal(&mut arena, "first");
            let second = animal(&mut arena, "second");
            arena.place(first, loc).unwrap();

            arena.place(second, loc).unwrap();

            let evicted = arena.get(first).unwrap();
            assert!(!evicted.is_placed());
            arena.verify_consistency().unwrap();
        }

        #[test]
        fn remove_unplaced_fails() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            assert_eq!(arena.remove(id).unwrap_err(), EngineError::NotPlaced(id));
        }

        #[test]
        fn remove_discards_non_animals() {
            let mut arena = Arena::new(5, 5);
            let block = block_at(&mut arena, Location::new(0, 0));
            arena.remove(block).unwrap();
            assert!(arena.get(block).is_none());
            assert_eq!(arena.grid().occupied_count(), 0);
        }

        #[test]
        fn remove_keeps_animals() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            arena.place(id, Location::new(0, 0)).unwrap();
            arena.remove(id).unwrap();
            assert!(arena.get(id).is_some());
            assert!(!arena.get(id).unwrap().is_placed());
        }

        #[test]
        fn remove_detects_mismatch() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            let loc = Location::new(3, 3);
            arena.place(id, loc).unwrap();
            // Corrupt the grid behind the arena's back.
            arena.grid.put(loc, EntityId::new(99));

            let err = arena.remove(id).unwrap_err();
            assert_eq!(
                err,
                EngineError::OccupantMismatch {
                    location: loc,
                    expected: id,
                    found: Some(EntityId::new(99)),
                }
            );
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn move_to_relocates() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            arena.place(id, Location::new(2, 2)).unwrap();

            arena.move_to(id, Location::new(2, 3)).unwrap();

            assert_eq!(arena.id_at(Location::new(2, 2)), None);
            assert_eq!(arena.id_at(Location::new(2, 3)), Some(id));
            arena.verify_consistency().unwrap();
        }

        #[test]
        fn move_to_same_cell_is_noop() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            let loc = Location::new(2, 2);
            arena.place(id, loc).unwrap();

            arena.move_to(id, loc).unwrap();

            assert_eq!(arena.id_at(loc), Some(id));
            assert_eq!(arena.grid().occupied_count(), 1);
        }

        #[test]
        fn move_to_unplaced_fails() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            assert_eq!(
                arena.move_to(id, Location::new(0, 0)).unwrap_err(),
                EngineError::NotPlaced(id)
            );
        }

        #[test]
        fn move_to_off_grid_fails_and_leaves_entity() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            arena.place(id, Location::new(0, 0)).unwrap();

            let target = Location::new(-1, 0);
            assert_eq!(
                arena.move_to(id, target).unwrap_err(),
                EngineError::InvalidLocation(target)
            );
            assert_eq!(arena.id_at(Location::new(0, 0)), Some(id));
        }

        #[test]
        fn move_to_evicts_trail() {
            let mut arena = Arena::new(5, 5);
            let id = animal(&mut arena, "a");
            arena.place(id, Location::new(0, 0)).unwrap();
            let trail = arena
                .spawn_at(
                    EntityInner::Trail(TrailComponents),
                    Direction::North,
                    Color::RED,
                    Location::new(0, 1),
                )
                .unwrap();

            arena.move_to(id, Location::new(0, 1)).unwrap();

            assert!(arena.get(trail).is_none());
            arena.verify_consistency().unwrap();
        }

        #[test]
        fn enterable_cells() {
            let mut arena = Arena::new(5, 5);
            block_at(&mut arena, Location::new(0, 0));
            prize_at(&mut arena, Location::new(0, 1));

            assert!(!arena.is_enterable(Location::new(0, 0)));
            assert!(arena.is_enterable(Location::new(0, 1)));
            assert!(arena.is_enterable(Location::new(0, 2)));
            assert!(!arena.is_enterable(Location::new(0, 5)));
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn clear_grid_keeps_only_animals() {
            let mut arena = Arena::new(5, 5);
            let a = animal(&mut arena, "a");
            arena.place(a, Location::new(4, 4)).unwrap();
            block_at(&mut arena, Location::new(0, 0));
            prize_at(&mut arena, Location::new(1, 1));

            arena.clear_grid();

            assert_eq!(arena.grid().occupied_count(), 0);
            assert_eq!(arena.entity_count(), 1);
            assert!(!arena.get(a).unwrap().is_placed());
            arena.verify_consistency().unwrap();
        }

        #[test]
        fn occupants_are_row_major() {
            let mut arena = Arena::new(5, 5);
            prize_at(&mut arena, Location::new(3, 0));
            block_at(&mut arena, Location::new(0, 4));
            let a = animal(&mut arena, "a");
            arena.place(a, Location::new(1, 2)).unwrap();

            let locs: Vec<_> = arena.occupants().into_iter().map(|(loc, _)| loc).collect();
            assert_eq!(
                locs,
                vec![Location::new(0, 4), Location::new(1, 2), Location::new(3, 0)]
            );
            assert_eq!(arena.animal_locations(), vec![Location::new(1, 2)]);
        }

        #[test]
        fn despawn_removes_animal() {
            let mut arena = Arena::new(5, 5);
            let a = animal(&mut arena, "a");
            arena.place(a, Location::new(0, 0)).unwrap();

            let entity = arena.despawn(a).unwrap();

            assert_eq!(entity.as_animal().unwrap().name, "a");
            assert!(arena.get(a).is_none());
            assert_eq!(arena.id_at(Location::new(0, 0)), None);
        }

        #[test]
        fn verify_detects_dangling_grid_entry() {
            let mut arena = Arena::new(5, 5);
            arena.grid.put(Location::new(0, 0), EntityId::new(42));
            assert_eq!(
                arena.verify_consistency().unwrap_err(),
                EngineError::UnknownEntity(EntityId::new(42))
            );
        }

        #[test]
        fn verify_detects_unrecorded_occupant() {
            let mut arena = Arena::new(5, 5);
            let a = animal(&mut arena, "a");
            arena.grid.put(Location::new(0, 0), a);
            assert_eq!(
                arena.verify_consistency().unwrap_err(),
                EngineError::NotPlaced(a)
            );
        }
    }
}
