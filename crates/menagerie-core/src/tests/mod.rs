//! Cross-module tests for the simulation.
//!
//! - `determinism.rs`: same seed, same game
//! - `integration.rs`: round scoring, round boundaries and full tournaments
//! - `properties.rs`: occupancy invariants under random action sequences
//! - `helpers.rs`: scripted brains and scenario setup

mod helpers;

pub use helpers::*;
