//! A brain that runs in straight lines.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::brain::{Action, Brain};
use crate::grid::Direction;
use crate::layout::random_heading;
use crate::snapshot::Snapshot;

/// Keeps moving the way it went last time. When that way is blocked it picks
/// a fresh random direction (which may itself be blocked).
#[derive(Debug, Clone)]
pub struct ForwardBrain {
    rng: ChaCha8Rng,
    last: Direction,
}

impl ForwardBrain {
    /// Creates the brain heading North.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            last: Direction::North,
        }
    }
}

impl Brain for ForwardBrain {
    fn name(&self) -> &str {
        "ForwardAnimal"
    }

    fn decide(&mut self, snapshot: &Snapshot) -> Action {
        if !snapshot.can_move(self.last) {
            self.last = random_heading(&mut self.rng);
        }
        Action::Move(self.last)
    }
}
