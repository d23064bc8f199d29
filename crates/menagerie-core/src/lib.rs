//! # Menagerie Core
//!
//! Turn-based grid arena where animals, each driven by a pluggable brain,
//! compete for prizes while dodging blocks and each other.
//!
//! ## Architecture
//!
//! - **Arena**: entity storage plus the occupancy grid, kept consistent in
//!   both directions
//! - **Brains**: decide an [`Action`](brain::Action) from a read-only
//!   [`Snapshot`](snapshot::Snapshot)
//! - **Resolvers**: apply actions (move, dart, build block, build wall) and
//!   count down temporary blocks
//! - **Simulation**: shuffled turn order, periodic prizes, and the round,
//!   match and round-robin lifecycle
//!
//! ## Usage
//!
//! ```
//! use menagerie_core::brain::BrainRegistry;
//! use menagerie_core::config::EngineConfig;
//! use menagerie_core::simulation::Simulation;
//!
//! let config = EngineConfig {
//!     moves_per_round: 20,
//!     rounds_per_match: 2,
//!     ..EngineConfig::default()
//! };
//! let registry = BrainRegistry::with_builtins();
//! let mut sim = Simulation::new(config, 7).unwrap();
//! for name in ["finder", "darter", "random"] {
//!     sim.enroll_brain(&registry, name).unwrap();
//! }
//!
//! let standings = sim.run_tournament().unwrap();
//! assert_eq!(standings.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod brain;
pub mod brains;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod grid;
pub mod layout;
pub mod resolver;
pub mod simulation;
pub mod snapshot;
pub mod tournament;

#[cfg(test)]
mod tests;

pub use arena::Arena;
pub use brain::{Action, Brain, BrainRegistry};
pub use config::{ConfigError, EngineConfig};
pub use entity::{Entity, EntityId, EntityTag};
pub use error::{EngineError, EngineResult};
pub use event::{TickEvent, TickReport};
pub use grid::{Direction, Location};
pub use layout::ChallengeMode;
pub use simulation::{Simulation, Standing};
pub use snapshot::Snapshot;
