//! Temporary block countdown.

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::error::{EngineError, EngineResult};
use crate::event::TickEvent;

/// Counts a block down by one tick and removes it when it reaches zero.
///
/// Permanent blocks are untouched.
///
/// # Errors
///
/// `UnknownEntity` if `block` is not a stored block, `NotPlaced` if it is
/// off the grid.
pub fn tick_block(arena: &mut Arena, block: EntityId) -> EngineResult<Option<TickEvent>> {
    let entity = arena.entity_mut(block)?;
    let at = entity.location().ok_or(EngineError::NotPlaced(block))?;
    let components = entity
        .as_block_mut()
        .ok_or(EngineError::UnknownEntity(block))?;

    let Some(remaining) = components.remaining.as_mut() else {
        return Ok(None);
    };
    *remaining = remaining.saturating_sub(1);
    if *remaining > 0 {
        return Ok(None);
    }

    arena.remove(block)?;
    Ok(Some(TickEvent::BlockExpired { block, at }))
}
