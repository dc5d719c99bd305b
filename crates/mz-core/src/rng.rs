//! Random number generation for maze construction
//!
//! Uses a seeded ChaCha RNG so that a given seed always grows the same maze.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded source of every random choice made while growing or rewiring a maze
///
/// Only the seed is stored; a deserialized RNG replays its stream from the
/// first draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct MazeRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl From<u64> for MazeRng {
    fn from(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl From<MazeRng> for u64 {
    fn from(rng: MazeRng) -> Self {
        rng.seed
    }
}

impl MazeRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Fresh RNG on an OS-random seed, for unseeded runs
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..n`
    ///
    /// Returns `None` if n is 0; an empty choice set is never papered over.
    pub fn index(&mut self, n: usize) -> Option<usize> {
        if n == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..n))
    }

    /// Uniform pick from `items`, `None` when it is empty
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }
}

impl Default for MazeRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
