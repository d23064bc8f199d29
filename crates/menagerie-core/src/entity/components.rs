//! Per-kind component structs and small shared value types.
//!
//! Each [`EntityInner`](super::EntityInner) variant carries one of the
//! component structs below. Positional state (location, heading, colour)
//! lives on [`Entity`](super::Entity) itself because every occupant has it.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

// =============================================================================
// Color
// =============================================================================

/// An RGB display colour.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Pure red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Orange.
    pub const ORANGE: Self = Self::rgb(255, 200, 0);
    /// Pure blue, the default colour for entities with nothing better.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Dark grey, used for blocks.
    pub const GRAY: Self = Self::rgb(64, 64, 64);
    /// Gold, used for prizes.
    pub const GOLD: Self = Self::rgb(212, 175, 55);

    const PALETTE: [Self; 8] = [
        Self::rgb(230, 25, 75),
        Self::rgb(60, 180, 75),
        Self::rgb(0, 130, 200),
        Self::rgb(245, 130, 48),
        Self::rgb(145, 30, 180),
        Self::rgb(70, 240, 240),
        Self::rgb(240, 50, 230),
        Self::rgb(128, 128, 0),
    ];

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default colour for the `index`-th animal whose brain has no preference.
    #[must_use]
    pub const fn palette(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }
}

// =============================================================================
// Animal
// =============================================================================

/// Match-level tallies for an animal.
///
/// Survives round resets; `rounds_won` is cleared between round-robin matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Rounds finished tied for the best score in the current match.
    pub rounds_won: u32,
    /// Round-robin matches won.
    pub matches_won: u32,
    /// Round-robin matches tied.
    pub matches_tied: u32,
    /// Round-robin matches lost.
    pub matches_lost: u32,
    /// Sum of completed round scores.
    pub total_score: i64,
}

impl Record {
    /// Tournament ranking: more matches won first, then more matches tied,
    /// then higher total score.
    ///
    /// `Less` means `self` ranks above `other`, so sorting with this puts
    /// the leader first.
    #[must_use]
    pub fn standing_order(&self, other: &Self) -> Ordering {
        other
            .matches_won
            .cmp(&self.matches_won)
            .then(other.matches_tied.cmp(&self.matches_tied))
            .then(other.total_score.cmp(&self.total_score))
    }
}

/// Components for Animal entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalComponents {
    /// Display name, taken from the brain.
    pub name: String,
    /// Score in the current round.
    pub score: i64,
    /// Match and tournament tallies.
    pub record: Record,
}

impl AnimalComponents {
    /// Creates components for a freshly enrolled animal.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Banks the round score into the running total and zeroes it.
    pub fn reset_for_round(&mut self) {
        self.record.total_score += self.score;
        self.score = 0;
    }

    /// Zeroes the score and every tally.
    pub fn clear_scores(&mut self) {
        self.score = 0;
        self.record = Record::default();
    }
}

// =============================================================================
// Block / Prize / Trail
// =============================================================================

/// Components for Block entities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockComponents {
    /// Ticks left before the block removes itself; `None` is permanent.
    pub remaining: Option<u32>,
}

impl BlockComponents {
    /// A block that never expires.
    #[must_use]
    pub const fn permanent() -> Self {
        Self { remaining: None }
    }

    /// A block that lasts `ticks` of its own turns.
    #[must_use]
    pub const fn temporary(ticks: u32) -> Self {
        Self {
            remaining: Some(ticks),
        }
    }
}

/// Prize categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrizeKind {
    /// Spawned periodically at a random spot.
    Standard,
    /// Spawned at one of the four fixed slots.
    Super,
    /// Reward dropped when an animal builds a block.
    Built,
}

/// Components for Prize entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeComponents {
    /// Points credited to the animal that collects it.
    pub value: i64,
    /// Category.
    pub kind: PrizeKind,
}

impl PrizeComponents {
    /// Creates prize components.
    #[must_use]
    pub const fn new(kind: PrizeKind, value: i64) -> Self {
        Self { value, kind }
    }
}

/// Components for Trail entities. Trails carry no state beyond their colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailComponents;
