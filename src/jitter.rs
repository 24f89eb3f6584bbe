/// Injectable bounded-random source.
///
/// The fallback estimator and potability scorer both add a small bounded
/// perturbation to their outputs. The draw is injected as a trait object
/// rather than sampled from a process-global RNG so tests can substitute a
/// fixed value and assert exact outputs, the same way time-dependent logic
/// here takes an injected `now` instead of calling `Utc::now()`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in [-1, 1].
pub trait JitterSource {
    /// Draw the next value. Implementations must stay within [-1, 1];
    /// downstream consumers clamp their results anyway.
    fn draw(&mut self) -> f64;
}

/// Production source backed by a seedable PRNG.
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    /// Seed from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed seed for reproducible runs (dev mode, debugging).
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for RandomJitter {
    fn draw(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }
}

/// Returns the same value on every draw. Intended for tests and for the
/// deterministic paths of dev mode.
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn draw(&mut self) -> f64 {
        self.0
    }
}
