//! Deterministic random number generation for replayable battles.
//!
//! ## Key Features
//!
//! - **Injectable**: every random decision goes through [`RandomSource`], so
//!   hosts and tests can substitute a scripted source
//! - **Deterministic**: same seed produces identical battles
//! - **Serializable**: O(1) state capture and restore for replay checkpoints
//!
//! ```
//! use ether_duel::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.chance(0.5), b.chance(0.5));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The random port consumed by the battle core.
///
/// Stance rolls, weapon jam rolls and secondary-card draws all take a
/// `&mut dyn RandomSource` (or a generic `R: RandomSource`); the core keeps no
/// hidden generator of its own.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// True with the given probability. Probabilities outside `[0, 1]` clamp.
    fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.next_f64() < probability
    }

    /// Index chosen with weighted probability.
    ///
    /// Weights do not need to sum to 1.0. Returns `None` if weights are
    /// empty or all zero.
    fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.next_f64() * total;
        for (i, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            threshold -= weight;
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Floating point edge case - return last non-zero weight
        weights.iter().rposition(|w| *w > 0.0)
    }
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl RandomSource for GameRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Serializable RNG state for replay checkpoints.
///
/// Uses ChaCha8 word position for O(1) serialization regardless of
/// how many random numbers have been generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of rolls, then repeats the last one.
    struct Scripted(Vec<f64>, usize);

    impl RandomSource for Scripted {
        fn next_f64(&mut self) -> f64 {
            let v = self.0[self.1.min(self.0.len() - 1)];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.next_f64(), rng2.next_f64());
        }
    }

    #[test]
    fn test_chance_clamps() {
        let mut rng = Scripted(vec![0.99], 0);
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
        assert!(!rng.chance(0.5));
        // Out-of-range probabilities never consume a roll
        assert_eq!(rng.1, 1);
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = Scripted(vec![0.0, 0.5, 0.95], 0);
        let weights = [0.4, 0.3, 0.3];
        assert_eq!(rng.choose_weighted(&weights), Some(0));
        assert_eq!(rng.choose_weighted(&weights), Some(1));
        assert_eq!(rng.choose_weighted(&weights), Some(2));

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 2.0]), Some(1));
    }

    #[test]
    fn test_state_roundtrip_resumes_sequence() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.next_f64();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.next_f64()).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.next_f64()).collect();
        assert_eq!(expected, actual);
    }
}
