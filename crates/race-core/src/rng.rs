//! Seeded per-car and race-level RNG wrappers.
//!
//! # Seeding strategy
//!
//! Each car gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (car_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive car ids uniformly across the seed space.  A
//! given seed therefore always produces the same fleet (trip lengths, cycle
//! lengths, delays).  It does *not* make the race itself reproducible: who
//! crashes and who wins depends on thread interleaving.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::CarId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── CarRng ────────────────────────────────────────────────────────────────────

/// Per-car seeded RNG used to draw a car's fixed parameters at fleet
/// creation.
pub struct CarRng(SmallRng);

impl CarRng {
    /// Seed from the race's global seed and a car id.
    pub fn new(global_seed: u64, car: CarId) -> Self {
        let seed = global_seed ^ (car.0 as u64).wrapping_mul(MIXING_CONSTANT);
        CarRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── RaceRng ───────────────────────────────────────────────────────────────────

/// Orchestrator-level RNG (start stagger between spawned cars).
///
/// Used only on the orchestrating thread.
pub struct RaceRng(SmallRng);

impl RaceRng {
    pub fn new(seed: u64) -> Self {
        RaceRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `RaceRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> RaceRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        RaceRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
