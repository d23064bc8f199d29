//! Action resolution.
//!
//! Resolvers turn a chosen [`Action`] into arena mutations and report what
//! happened as [`TickEvent`]s. They are the only code that moves animals or
//! builds blocks during a tick.
//!
//! - [`movement`]: single steps and darts, prize credit, trails
//! - [`construction`]: single blocks and walls
//! - [`decay`]: temporary blocks counting down
//!
//! # Invariants
//!
//! - An animal never enters a cell holding an animal or a block.
//! - A prize is credited at most once: crediting it removes it.
//! - Every cell an animal leaves by moving receives a trail in the animal's
//!   colour.
//! - Illegal actions change nothing except the animal's facing.

pub mod construction;
pub mod decay;
pub mod movement;

use rand::Rng;

use crate::arena::Arena;
use crate::brain::Action;
use crate::config::EngineConfig;
use crate::entity::{EntityId, EntityInner, TrailComponents};
use crate::error::{EngineError, EngineResult};
use crate::event::TickEvent;
use crate::grid::{Direction, Location};

/// Mutable state a resolver may touch.
pub struct ResolveContext<'a, R: Rng + ?Sized> {
    /// The arena being mutated.
    pub arena: &'a mut Arena,
    /// Randomness for placement searches.
    pub rng: &'a mut R,
    /// Engine constants.
    pub config: &'a EngineConfig,
}

impl<'a, R: Rng + ?Sized> ResolveContext<'a, R> {
    /// Bundles the pieces a resolver needs.
    pub fn new(arena: &'a mut Arena, rng: &'a mut R, config: &'a EngineConfig) -> Self {
        Self { arena, rng, config }
    }

    /// The animal's current cell.
    fn location_of(&self, id: EntityId) -> EngineResult<Location> {
        self.arena
            .entity(id)?
            .location()
            .ok_or(EngineError::NotPlaced(id))
    }

    /// Drops a trail in the animal's colour at `loc`.
    fn drop_trail(&mut self, animal: EntityId, loc: Location) -> EngineResult<()> {
        let color = self.arena.entity(animal)?.color();
        self.arena.spawn_at(
            EntityInner::Trail(TrailComponents),
            Direction::North,
            color,
            loc,
        )?;
        Ok(())
    }

    /// Credits and removes the prize at `loc`, if there is one.
    fn collect_prize(&mut self, animal: EntityId, loc: Location) -> EngineResult<Option<TickEvent>> {
        let Some(prize) = self.arena.entity_at(loc).and_then(|e| e.as_prize()).copied() else {
            return Ok(None);
        };
        let stats = self
            .arena
            .entity_mut(animal)?
            .as_animal_mut()
            .ok_or(EngineError::UnknownEntity(animal))?;
        stats.score += prize.value;

        if let Some(id) = self.arena.id_at(loc) {
            self.arena.remove(id)?;
        }
        Ok(Some(TickEvent::PrizeCollected {
            animal,
            value: prize.value,
            kind: prize.kind,
            at: loc,
        }))
    }
}

/// Applies `action` for `animal`.
///
/// The animal first turns to face the action's direction; a failed action
/// still leaves it facing that way.
///
/// # Errors
///
/// Arena invariant violations, or `NotPlaced` if the animal is off the grid.
pub fn resolve_action<R: Rng + ?Sized>(
    ctx: &mut ResolveContext<'_, R>,
    animal: EntityId,
    action: Action,
) -> EngineResult<Vec<TickEvent>> {
    if let Some(dir) = action.direction() {
        ctx.arena.set_heading(animal, dir)?;
    }

    match action {
        Action::Rest | Action::Turn(_) => Ok(Vec::new()),
        Action::Move(dir) => movement::step(ctx, animal, dir),
        Action::Dart(dir) => movement::dart(ctx, animal, dir),
        Action::BuildBlock(dir) => construction::build_block(ctx, animal, dir),
        Action::BuildWall(dir) => construction::build_wall(ctx, animal, dir),
    }
}
