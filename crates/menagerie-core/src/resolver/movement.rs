//! Single steps and darts.
//!
//! A cell can be entered when it is on the grid and holds neither an animal
//! nor a block. Entering a prize cell credits the prize.
//!
//! Darts repeat the step until the next cell cannot be entered. Prize cells
//! met along the way are leapt rather than entered: the animal lands on the
//! next free cell beyond and the prize stays put. Only the cell where the dart
//! finally stops is checked for a prize.

use rand::Rng;

use crate::entity::{EntityId, EntityTag};
use crate::error::EngineResult;
use crate::event::TickEvent;
use crate::grid::Direction;

use super::ResolveContext;

/// Moves the animal one cell in `dir` if that cell can be entered.
///
/// # Errors
///
/// Arena invariant violations.
pub fn step<R: Rng + ?Sized>(
    ctx: &mut ResolveContext<'_, R>,
    animal: EntityId,
    dir: Direction,
) -> EngineResult<Vec<TickEvent>> {
    let from = ctx.location_of(animal)?;
    let to = from.adjacent(dir);
    if !ctx.arena.is_enterable(to) {
        return Ok(Vec::new());
    }

    let mut events = Vec::new();
    events.extend(ctx.collect_prize(animal, to)?);
    ctx.arena.move_to(animal, to)?;
    ctx.drop_trail(animal, from)?;
    events.push(TickEvent::Moved { animal, from, to });
    Ok(events)
}

/// Moves the animal in `dir` until the next cell cannot be entered.
///
/// If even the first cell is blocked nothing happens.
///
/// # Errors
///
/// Arena invariant violations.
pub fn dart<R: Rng + ?Sized>(
    ctx: &mut ResolveContext<'_, R>,
    animal: EntityId,
    dir: Direction,
) -> EngineResult<Vec<TickEvent>> {
    let start = ctx.location_of(animal)?;
    let mut current = start;
    let mut probe = start;

    loop {
        let next = probe.adjacent(dir);
        if !ctx.arena.is_enterable(next) {
            break;
        }
        probe = next;
        if ctx.arena.tag_at(probe) == Some(EntityTag::Prize) {
            continue;
        }
        ctx.arena.move_to(animal, probe)?;
        ctx.drop_trail(animal, current)?;
        current = probe;
    }

    let mut events = Vec::new();
    if probe != current {
        // Stopped on a prize.
        events.extend(ctx.collect_prize(animal, probe)?);
        ctx.arena.move_to(animal, probe)?;
        ctx.drop_trail(animal, current)?;
    }

    if probe != start {
        let cells = (probe.row - start.row).unsigned_abs() + (probe.col - start.col).unsigned_abs();
        events.push(TickEvent::Darted {
            animal,
            from: start,
            to: probe,
            cells,
        });
    }
    Ok(events)
}
