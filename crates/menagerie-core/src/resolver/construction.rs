//! Building blocks and walls.
//!
//! A block may go on any valid cell not holding an animal or a block; a prize
//! or trail there is destroyed. Single blocks are permanent and earn the
//! builder's side a `Built` prize somewhere on the grid. Walls are seven
//! temporary blocks laid across the facing cell.

use rand::Rng;

use crate::entity::{BlockComponents, Color, EntityId, EntityInner, PrizeKind};
use crate::error::EngineResult;
use crate::event::TickEvent;
use crate::grid::{Direction, Location};
use crate::layout::{find_prize_location, place_prize};

use super::ResolveContext;

/// Blocks on each side of the wall's centre.
pub const WALL_HALF_WIDTH: i32 = 3;

/// Cells a wall built from `origin` facing `dir` would cover, in placement
/// order: the facing cell, then alternately left and right of it moving
/// outward. Cells may lie off the grid.
#[must_use]
pub fn wall_cells(origin: Location, dir: Direction) -> Vec<Location> {
    let center = origin.adjacent(dir);
    let (left_dir, right_dir) = (dir.rotated_left(), dir.rotated_right());
    let mut cells = vec![center];
    let (mut left, mut right) = (center, center);
    for _ in 0..WALL_HALF_WIDTH {
        left = left.adjacent(left_dir);
        right = right.adjacent(right_dir);
        cells.push(left);
        cells.push(right);
    }
    cells
}

/// Puts a permanent block in the facing cell, then tries to place a `Built`
/// prize using the random prize policy.
///
/// # Errors
///
/// Arena invariant violations.
pub fn build_block<R: Rng + ?Sized>(
    ctx: &mut ResolveContext<'_, R>,
    animal: EntityId,
    dir: Direction,
) -> EngineResult<Vec<TickEvent>> {
    let at = ctx.location_of(animal)?.adjacent(dir);
    if !ctx.arena.is_enterable(at) {
        return Ok(Vec::new());
    }

    ctx.arena.spawn_at(
        EntityInner::Block(BlockComponents::permanent()),
        Direction::North,
        Color::GRAY,
        at,
    )?;
    let mut events = vec![TickEvent::BlockBuilt { animal, at }];

    if let Some(loc) = find_prize_location(ctx.arena, ctx.rng, ctx.config) {
        let prize = place_prize(ctx.arena, PrizeKind::Built, ctx.config.built_prize_value, loc)?;
        events.push(TickEvent::PrizeSpawned {
            prize,
            kind: PrizeKind::Built,
            at: loc,
        });
    }
    Ok(events)
}

/// Puts a temporary block on every wall cell that can take one.
///
/// # Errors
///
/// Arena invariant violations.
pub fn build_wall<R: Rng + ?Sized>(
    ctx: &mut ResolveContext<'_, R>,
    animal: EntityId,
    dir: Direction,
) -> EngineResult<Vec<TickEvent>> {
    let origin = ctx.location_of(animal)?;
    let mut built = Vec::new();
    for loc in wall_cells(origin, dir) {
        if !ctx.arena.is_enterable(loc) {
            continue;
        }
        ctx.arena.spawn_at(
            EntityInner::Block(BlockComponents::temporary(ctx.config.wall_block_duration)),
            Direction::North,
            Color::GRAY,
            loc,
        )?;
        built.push(loc);
    }

    if built.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![TickEvent::WallBuilt {
        animal,
        cells: built,
    }])
}
