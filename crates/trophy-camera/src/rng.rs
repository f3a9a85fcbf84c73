//! RNG trait abstraction for motion selection
//!
//! Lets the selector run on:
//! - a seeded `Xoshiro256StarStar` (tests, reproducible tours)
//! - an entropy-seeded generator (browser)

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

/// Random source used to pick among candidate motions
pub trait PickRng {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> PickRng for T {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::Rng::gen_range(self, 0..len)
    }
}

/// Build the selector RNG: seeded when a seed is given, entropy otherwise.
pub fn tour_rng(seed: Option<u64>) -> Xoshiro256StarStar {
    match seed {
        Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
        None => Xoshiro256StarStar::from_entropy(),
    }
}
