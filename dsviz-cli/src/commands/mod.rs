//! Non-interactive command implementations for the dsviz CLI

pub mod hash;
pub mod maze;

pub use hash::run_hash;
pub use maze::run_maze;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded RNG when a seed is given, OS entropy otherwise
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::debug!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}
