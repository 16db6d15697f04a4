//! Seeded RNG construction shared by the runners.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Deterministic RNG for a given seed.
///
/// Every source of randomness in the engine flows through one of these,
/// created once per run, so a seeded run is fully reproducible.
pub(crate) fn create_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
