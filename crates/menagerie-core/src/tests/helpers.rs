//! Test brains and setup utilities.

use crate::brain::{Action, Brain, BrainRegistry};
use crate::config::EngineConfig;
use crate::entity::{Color, EntityId, EntityTag};
use crate::grid::Location;
use crate::simulation::Simulation;
use crate::snapshot::Snapshot;

// =============================================================================
// Scripted brain
// =============================================================================

/// A brain that replays a fixed list of actions, cycling when it runs out.
///
/// An empty script rests every turn.
#[derive(Debug, Clone)]
pub struct ScriptedBrain {
    name: String,
    script: Vec<Action>,
    cursor: usize,
    color: Option<Color>,
}

impl ScriptedBrain {
    pub fn new(name: &str, script: Vec<Action>) -> Self {
        Self {
            name: name.to_string(),
            script,
            cursor: 0,
            color: None,
        }
    }

    pub fn resting(name: &str) -> Self {
        Self::new(name, Vec::new())
    }

    /// Replays raw integer action codes.
    pub fn from_codes(name: &str, codes: &[i32]) -> Self {
        Self::new(name, codes.iter().copied().map(Action::from_code).collect())
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

impl Brain for ScriptedBrain {
    fn name(&self) -> &str {
        &self.name
    }

    fn preferred_color(&self) -> Option<Color> {
        self.color
    }

    fn decide(&mut self, _snapshot: &Snapshot) -> Action {
        if self.script.is_empty() {
            return Action::Rest;
        }
        let action = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        action
    }
}

// =============================================================================
// Scenario setup
// =============================================================================

/// A short-round config: `moves` ticks per round, `rounds` per match.
pub fn quick_config(moves: u32, rounds: u32) -> EngineConfig {
    EngineConfig {
        moves_per_round: moves,
        rounds_per_match: rounds,
        ..EngineConfig::default()
    }
}

/// A simulation with the named built-in brains in play.
pub fn sim_with_builtins(config: EngineConfig, seed: u64, names: &[&str]) -> Simulation {
    let registry = BrainRegistry::with_builtins();
    let mut sim = Simulation::new(config, seed).unwrap();
    for name in names {
        sim.add_brain(&registry, name).unwrap();
    }
    sim
}

/// Sets an animal's current-round score directly.
pub fn set_score(sim: &mut Simulation, id: EntityId, score: i64) {
    sim.arena_mut()
        .get_mut(id)
        .unwrap()
        .as_animal_mut()
        .unwrap()
        .score = score;
}

/// Every placed entity as `(location, id, tag)` in row-major order.
pub fn occupancy(sim: &Simulation) -> Vec<(Location, EntityId, EntityTag)> {
    sim.arena()
        .occupants()
        .into_iter()
        .map(|(loc, e)| (loc, e.id(), e.tag()))
        .collect()
}
