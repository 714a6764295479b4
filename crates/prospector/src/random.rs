//! Seeded random source for world generation.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic generator used while a world is built.
///
/// The same seed always produces the same asteroid field.
pub struct WorldRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl WorldRng {
    /// Creates a generator from a fixed seed.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates a generator from `seed`, or from the clock when `None`.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| elapsed.as_nanos() as u64)
        });
        Self::from_seed(seed)
    }

    /// The seed this generator started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `lo..hi`; returns `lo` when the range is empty.
    pub fn next_int(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.rng.gen_range(lo..hi)
    }

    /// Uniform float in `lo..hi`.
    pub fn next_double(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.rng.gen::<f64>() * (hi - lo)
    }

    /// Returns true with probability `percent / 100`.
    pub fn percent(&mut self, percent: u32) -> bool {
        self.next_int(0, 100) < percent as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = WorldRng::from_seed(42);
        let mut b = WorldRng::from_seed(42);
        for _ in 0..32 {
            assert_eq!(a.next_int(-200, 200), b.next_int(-200, 200));
        }
    }

    #[test]
    fn test_ranges_are_half_open() {
        let mut rng = WorldRng::from_seed(7);
        for _ in 0..1_000 {
            let i = rng.next_int(1, 11);
            assert!((1..11).contains(&i));
            let d = rng.next_double(0.0, 0.1);
            assert!((0.0..0.1).contains(&d));
        }
        assert_eq!(rng.next_int(5, 5), 5);
    }

    #[test]
    fn test_percent_extremes() {
        let mut rng = WorldRng::from_seed(1);
        assert!((0..100).all(|_| !rng.percent(0)));
        assert!((0..100).all(|_| rng.percent(100)));
    }
}
