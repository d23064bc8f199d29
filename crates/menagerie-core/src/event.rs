//! Events emitted while a tick is resolved.
//!
//! Events do not drive anything inside the engine; they exist so callers
//! (tests, the CLI, a renderer) can see what a tick did without diffing the
//! arena.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, PrizeKind};
use crate::grid::Location;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    /// An animal stepped one cell.
    Moved {
        /// The animal.
        animal: EntityId,
        /// Cell it left.
        from: Location,
        /// Cell it entered.
        to: Location,
    },
    /// An animal darted in a straight line.
    Darted {
        /// The animal.
        animal: EntityId,
        /// Cell it started in.
        from: Location,
        /// Cell it stopped in.
        to: Location,
        /// Steps taken.
        cells: u32,
    },
    /// An animal collected a prize.
    PrizeCollected {
        /// The animal.
        animal: EntityId,
        /// Points credited.
        value: i64,
        /// Category of the prize.
        kind: PrizeKind,
        /// Where it was collected.
        at: Location,
    },
    /// A prize appeared on the grid.
    PrizeSpawned {
        /// The new prize.
        prize: EntityId,
        /// Category of the prize.
        kind: PrizeKind,
        /// Where it was placed.
        at: Location,
    },
    /// An animal built a single permanent block.
    BlockBuilt {
        /// The builder.
        animal: EntityId,
        /// Where the block went.
        at: Location,
    },
    /// An animal built a wall of temporary blocks.
    WallBuilt {
        /// The builder.
        animal: EntityId,
        /// Cells that received a block, in candidate order.
        cells: Vec<Location>,
    },
    /// A temporary block ran out and removed itself.
    BlockExpired {
        /// The block.
        block: EntityId,
        /// Cell it vacated.
        at: Location,
    },
    /// The last tick of a round was played and the round was scored.
    RoundCompleted {
        /// Round that just ended.
        round: u32,
        /// Best score of the round.
        best_score: i64,
        /// Every animal tied at the best score.
        winners: Vec<EntityId>,
    },
    /// A round-robin match ended.
    MatchCompleted {
        /// First combatant of the pairing.
        first: EntityId,
        /// Second combatant of the pairing.
        second: EntityId,
        /// Rounds won by `first` and `second`.
        rounds_won: (u32, u32),
    },
    /// Every round-robin pairing has been played.
    TournamentComplete,
}

/// Summary of one call to [`Simulation::step`](crate::simulation::Simulation::step).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TickReport {
    /// Move number after the tick (the next move to play).
    pub move_number: u32,
    /// Round number after the tick.
    pub round_number: u32,
    /// Events in the order they happened.
    pub events: Vec<TickEvent>,
}

impl TickReport {
    /// Returns true if the tick ended a round.
    #[must_use]
    pub fn completed_round(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, TickEvent::RoundCompleted { .. }))
    }

    /// Returns true if the tick ended the round-robin tournament.
    #[must_use]
    pub fn completed_tournament(&self) -> bool {
        self.events.contains(&TickEvent::TournamentComplete)
    }

    /// Total points collected during the tick.
    #[must_use]
    pub fn points_collected(&self) -> i64 {
        self.events
            .iter()
            .map(|e| match e {
                TickEvent::PrizeCollected { value, .. } => *value,
                _ => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_queries() {
        let report = TickReport {
            move_number: 1,
            round_number: 2,
            events: vec![
                TickEvent::PrizeCollected {
                    animal: EntityId::new(0),
                    value: 100,
                    kind: PrizeKind::Standard,
                    at: Location::new(1, 1),
                },
                TickEvent::PrizeCollected {
                    animal: EntityId::new(1),
                    value: 500,
                    kind: PrizeKind::Super,
                    at: Location::new(10, 1),
                },
                TickEvent::RoundCompleted {
                    round: 1,
                    best_score: 500,
                    winners: vec![EntityId::new(1)],
                },
            ],
        };
        assert!(report.completed_round());
        assert!(!report.completed_tournament());
        assert_eq!(report.points_collected(), 600);
    }

    #[test]
    fn events_serialize() {
        let event = TickEvent::WallBuilt {
            animal: EntityId::new(3),
            cells: vec![Location::new(0, 0), Location::new(0, 1)],
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: TickEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
