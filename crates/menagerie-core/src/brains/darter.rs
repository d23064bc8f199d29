//! A brain that only darts.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::brain::{Action, Brain};
use crate::layout::random_heading;
use crate::snapshot::Snapshot;

/// Darts in a uniformly random direction every turn.
#[derive(Debug, Clone)]
pub struct DarterBrain {
    rng: ChaCha8Rng,
}

impl DarterBrain {
    /// Creates the brain with its own seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Brain for DarterBrain {
    fn name(&self) -> &str {
        "DarterAnimal"
    }

    fn decide(&mut self, _snapshot: &Snapshot) -> Action {
        Action::Dart(random_heading(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brains::test_support::{lone_animal, snapshot};

    #[test]
    fn always_darts() {
        let (arena, id) = lone_animal();
        let view = snapshot(&arena, id);
        let mut brain = DarterBrain::new(9);
        assert!((0..40).all(|_| matches!(brain.decide(&view), Action::Dart(_))));
    }
}
