//! Round-robin pairing.
//!
//! Every competitor meets every other exactly once. Pairs are produced in
//! lexicographic order of roster indices: `(0, 1), (0, 2), .., (0, n-1),
//! (1, 2), ..`. For `n` competitors there are `n * (n - 1) / 2` matches.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Smallest roster a round-robin can run with.
pub const MIN_COMPETITORS: usize = 2;

/// Cursor over the pairings of a round-robin tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRobin {
    competitors: usize,
    first: usize,
    second: usize,
    complete: bool,
}

impl RoundRobin {
    /// Starts a tournament over `competitors` roster entries, positioned on
    /// the first pair `(0, 1)`.
    ///
    /// # Errors
    ///
    /// `RosterTooSmall` if fewer than two competitors are given.
    pub fn new(competitors: usize) -> EngineResult<Self> {
        if competitors < MIN_COMPETITORS {
            return Err(EngineError::RosterTooSmall {
                needed: MIN_COMPETITORS,
                found: competitors,
            });
        }
        Ok(Self {
            competitors,
            first: 0,
            second: 1,
            complete: false,
        })
    }

    /// Number of competitors.
    #[must_use]
    pub const fn competitors(&self) -> usize {
        self.competitors
    }

    /// Total number of matches in the tournament.
    #[must_use]
    pub const fn match_count(&self) -> usize {
        self.competitors * (self.competitors - 1) / 2
    }

    /// The pair currently being played, or `None` once complete.
    #[must_use]
    pub const fn current_pair(&self) -> Option<(usize, usize)> {
        if self.complete {
            None
        } else {
            Some((self.first, self.second))
        }
    }

    /// Returns true once every pair has been played.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    /// Moves to the next pair. Returns false when there is none.
    pub fn advance(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.second += 1;
        if self.second == self.competitors {
            self.first += 1;
            self.second = self.first + 1;
            if self.first == self.competitors - 1 {
                self.complete = true;
                return false;
            }
        }
        true
    }

    /// Every pair of the tournament, in play order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        (0..self.competitors)
            .flat_map(|i| (i + 1..self.competitors).map(move |j| (i, j)))
            .collect()
    }
}
