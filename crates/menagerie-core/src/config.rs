//! Engine configuration.
//!
//! [`EngineConfig`] collects every tunable constant of the simulation. All
//! fields have defaults, so a JSON override file only needs to name the values
//! it changes:
//!
//! ```
//! use menagerie_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_json_str(r#"{ "moves_per_round": 50 }"#).unwrap();
//! assert_eq!(config.moves_per_round, 50);
//! assert_eq!(config.rows, 21);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::ChallengeMode;

/// Smallest grid the standard block layout fits in.
pub const MIN_GRID_SIZE: i32 = 9;

/// Shortest standard prize interval. The schedule spawns on ticks where
/// `(tick - 1) % turns_per_prize == 0`, so an interval of 1 would spawn on
/// every tick.
pub const MIN_PRIZE_INTERVAL: u32 = 2;

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// One or more fields hold unusable values; each message names the field.
    #[error("invalid configuration:\n{}", .0.join("\n"))]
    Invalid(Vec<String>),
}

/// Tunable constants for a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Grid rows.
    pub rows: i32,
    /// Grid columns.
    pub cols: i32,
    /// Ticks in a round.
    pub moves_per_round: u32,
    /// Rounds in a round-robin match.
    pub rounds_per_match: u32,
    /// A standard prize spawns every this many ticks.
    pub turns_per_prize: u32,
    /// A super prize spawns every this many ticks.
    pub turns_per_super_prize: u32,
    /// Value of a standard prize.
    pub prize_value: i64,
    /// Value of a super prize.
    pub super_prize_value: i64,
    /// Value of the prize dropped after building a block.
    pub built_prize_value: i64,
    /// Random prizes are kept at least this far from every animal.
    pub prize_proximity: i32,
    /// Random prizes are kept further than this from every super slot.
    pub super_slot_clearance: i32,
    /// Random cells tried before giving up on a prize.
    pub placement_attempts: u32,
    /// Random slots tried before giving up on a super prize.
    pub super_slot_attempts: u32,
    /// Lifetime, in ticks, of a wall block.
    pub wall_block_duration: u32,
    /// Lifetime, in ticks, of the blocks laid out at the start of a round.
    pub layout_block_lifetime: u32,
    /// Initial challenge mode (1 single prize, 2 plus sign, 3 standard).
    pub play_mode: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 21,
            cols: 21,
            moves_per_round: 500,
            rounds_per_match: 100,
            turns_per_prize: 10,
            turns_per_super_prize: 100,
            prize_value: 100,
            super_prize_value: 500,
            built_prize_value: 0,
            prize_proximity: 10,
            super_slot_clearance: 2,
            placement_attempts: 100,
            super_slot_attempts: 10,
            wall_block_duration: 20,
            layout_block_lifetime: 1000,
            play_mode: 3,
        }
    }
}

impl EngineConfig {
    /// Parses overrides from JSON and validates the result.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field, collecting all problems rather than the first.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] listing each offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.rows < MIN_GRID_SIZE || self.cols < MIN_GRID_SIZE {
            errors.push(format!(
                "grid must be at least {MIN_GRID_SIZE}x{MIN_GRID_SIZE}, got {}x{}",
                self.rows, self.cols
            ));
        }

        let counts = [
            ("moves_per_round", self.moves_per_round),
            ("rounds_per_match", self.rounds_per_match),
            ("turns_per_super_prize", self.turns_per_super_prize),
            ("placement_attempts", self.placement_attempts),
            ("super_slot_attempts", self.super_slot_attempts),
            ("wall_block_duration", self.wall_block_duration),
            ("layout_block_lifetime", self.layout_block_lifetime),
        ];
        for (name, value) in counts {
            if value == 0 {
                errors.push(format!("{name} must be > 0"));
            }
        }

        if self.turns_per_prize < MIN_PRIZE_INTERVAL {
            errors.push(format!(
                "turns_per_prize must be >= {MIN_PRIZE_INTERVAL}, got {}",
                self.turns_per_prize
            ));
        }

        if self.prize_proximity < 0 || self.super_slot_clearance < 0 {
            errors.push(format!(
                "prize_proximity and super_slot_clearance must be >= 0, got {} and {}",
                self.prize_proximity, self.super_slot_clearance
            ));
        }

        if ChallengeMode::try_from(self.play_mode).is_err() {
            errors.push(format!(
                "play_mode must be 1, 2 or 3, got {}",
                self.play_mode
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
