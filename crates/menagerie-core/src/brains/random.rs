//! A brain that wanders aimlessly.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::brain::{Action, Brain};
use crate::entity::Color;
use crate::layout::random_heading;
use crate::snapshot::Snapshot;

/// Moves one step in a uniformly random direction every turn.
///
/// ```
/// use menagerie_core::brain::Brain;
/// use menagerie_core::brains::RandomBrain;
///
/// let brain = RandomBrain::new(1);
/// assert_eq!(brain.name(), "RandomAnimal");
/// ```
#[derive(Debug, Clone)]
pub struct RandomBrain {
    rng: ChaCha8Rng,
}

impl RandomBrain {
    /// Creates the brain with its own seeded RNG.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Brain for RandomBrain {
    fn name(&self) -> &str {
        "RandomAnimal"
    }

    fn preferred_color(&self) -> Option<Color> {
        Some(Color::ORANGE)
    }

    fn decide(&mut self, _snapshot: &Snapshot) -> Action {
        Action::Move(random_heading(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brains::test_support::{lone_animal, snapshot};

    #[test]
    fn always_moves() {
        let (arena, id) = lone_animal();
        let view = snapshot(&arena, id);
        let mut brain = RandomBrain::new(3);
        for _ in 0..50 {
            assert!(matches!(brain.decide(&view), Action::Move(_)));
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let (arena, id) = lone_animal();
        let view = snapshot(&arena, id);
        let mut a = RandomBrain::new(11);
        let mut b = RandomBrain::new(11);
        let left: Vec<_> = (0..20).map(|_| a.decide(&view)).collect();
        let right: Vec<_> = (0..20).map(|_| b.decide(&view)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn prefers_orange() {
        assert_eq!(RandomBrain::new(0).preferred_color(), Some(Color::ORANGE));
    }
}
