//! Random number source for the simulation policies.

use rand::SeedableRng;
use rand::rngs::StdRng;

/// A generator seeded from `seed` when given, otherwise from the thread RNG.
pub(crate) fn seeded(seed: Option<u64>) -> StdRng {
    seed.map_or_else(|| StdRng::from_rng(&mut rand::rng()), StdRng::seed_from_u64)
}
