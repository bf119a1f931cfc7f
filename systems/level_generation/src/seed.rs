//! Deterministic per-level random streams derived from a run seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Stream label for the random walk and candidate selection.
pub const RNG_STREAM_CARVE: &str = "maze-escape/carve";
/// Stream label for key placement.
pub const RNG_STREAM_KEY: &str = "maze-escape/key";

/// Derives the seed of one random stream of one level.
#[must_use]
pub fn derive_level_seed(run_seed: u64, level_index: u32, stream: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(run_seed.to_le_bytes());
    hasher.update(level_index.to_le_bytes());
    hasher.update(stream.as_bytes());
    finalize_seed(hasher)
}

/// Random generator for one stream of one level.
#[must_use]
pub fn level_rng(run_seed: u64, level_index: u32, stream: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_level_seed(run_seed, level_index, stream))
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
