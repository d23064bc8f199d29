//! A brain that notices prizes next to it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::brain::{Action, Brain};
use crate::grid::Direction;
use crate::layout::random_heading;
use crate::snapshot::Snapshot;

/// Chance, out of 10, that a wandering step becomes a dart.
const DART_ODDS: u32 = 1;

/// Steps onto an adjacent prize if there is one, checking North, East,
/// South, West in that order. Otherwise moves randomly, darting one time in
/// ten.
#[derive(Debug, Clone)]
pub struct FinderBrain {
    rng: ChaCha8Rng,
}

impl FinderBrain {
    /// Creates the brain with its own seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Brain for FinderBrain {
    fn name(&self) -> &str {
        "FinderAnimal"
    }

    fn decide(&mut self, snapshot: &Snapshot) -> Action {
        if let Some(dir) = Direction::ALL
            .into_iter()
            .find(|&dir| snapshot.is_prize_toward(dir))
        {
            return Action::Move(dir);
        }

        let dir = random_heading(&mut self.rng);
        if self.rng.gen_ratio(DART_ODDS, 10) {
            Action::Dart(dir)
        } else {
            Action::Move(dir)
        }
    }
}
