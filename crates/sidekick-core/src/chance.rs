//! Injectable randomness for the dialogue engine.
//!
//! Every probabilistic decision (persona shifts, flourishes, loot picks,
//! canned-response choice) goes through a [`Chance`] so tests can force
//! deterministic outcomes instead of asserting on statistics.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

pub trait Chance: Send {
    /// Uniform sample in `[0, 1)`.
    fn roll(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 for an empty range.
    fn pick(&mut self, len: usize) -> usize;

    /// True with the given probability.
    fn hits(&mut self, probability: f64) -> bool {
        self.roll() < probability
    }
}

/// Pick one element of a non-empty slice.
pub fn choose<'a, T>(chance: &mut dyn Chance, items: &'a [T]) -> &'a T {
    let idx = chance.pick(items.len()).min(items.len().saturating_sub(1));
    &items[idx]
}

/// Entropy-seeded source used in production.
pub struct ThreadChance {
    rng: StdRng,
}

impl ThreadChance {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for ThreadChance {
    fn default() -> Self {
        Self::new()
    }
}

impl Chance for ThreadChance {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Reproducible source for replaying a conversation.
pub struct SeededChance {
    rng: Pcg64,
}

impl SeededChance {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl Chance for SeededChance {
    fn roll(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }
}

/// Always returns the same roll and index.
///
/// `FixedChance::never()` makes every probabilistic branch miss and every
/// pick land on the first element.
#[derive(Debug, Clone, Copy)]
pub struct FixedChance {
    pub roll: f64,
    pub pick: usize,
}

impl FixedChance {
    pub fn new(roll: f64, pick: usize) -> Self {
        Self { roll, pick }
    }

    pub fn never() -> Self {
        Self::new(1.0, 0)
    }

    pub fn always() -> Self {
        Self::new(0.0, 0)
    }
}

impl Chance for FixedChance {
    fn roll(&mut self) -> f64 {
        self.roll
    }

    fn pick(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.pick % len
        }
    }
}
