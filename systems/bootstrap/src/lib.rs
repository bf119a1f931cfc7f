#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that turns level requests into a ready-to-play world.

use maze_escape_core::{GenerationError, LevelSpec};
use maze_escape_system_level_generation::{
    generate_crowded_level, level_rng, place_key, CarveConfig, RNG_STREAM_CARVE, RNG_STREAM_KEY,
};
use maze_escape_world::{World, WorldError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while preparing a new game.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BootstrapError {
    /// A level could not be generated.
    #[error("failed to generate level {level}")]
    Generation {
        /// Zero-based index of the failing level request.
        level: usize,
        /// Underlying generation failure.
        #[source]
        source: GenerationError,
    },
    /// The generated levels could not be assembled into a world.
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Generates every requested level from a single run seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    seed: u64,
    carve: CarveConfig,
}

impl Bootstrap {
    /// Creates a bootstrap for the provided run seed and carve tunables.
    #[must_use]
    pub const fn new(seed: u64, carve: CarveConfig) -> Self {
        Self { seed, carve }
    }

    /// Run seed every level stream derives from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generates the requested levels and positions a fresh world at level 0.
    pub fn new_game(&self, specs: &[LevelSpec]) -> Result<World, BootstrapError> {
        let mut levels = Vec::with_capacity(specs.len());
        let mut requires_key = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            let stream_index = u32::try_from(index).unwrap_or(u32::MAX);
            let fail = |source| BootstrapError::Generation {
                level: index,
                source,
            };

            let mut carve_rng = level_rng(self.seed, stream_index, RNG_STREAM_CARVE);
            let (mut level, gated) = generate_crowded_level(
                spec.width,
                spec.height,
                spec.candidates,
                spec.requires_key,
                &self.carve,
                &mut carve_rng,
            )
            .map_err(fail)?
            .into_parts();

            if gated {
                let mut key_rng = level_rng(self.seed, stream_index, RNG_STREAM_KEY);
                let site = place_key(&mut level, &mut key_rng).map_err(fail)?;
                debug!(
                    level = index,
                    column = site.column(),
                    row = site.row(),
                    "placed key"
                );
            }

            levels.push(level);
            requires_key.push(gated);
        }

        let world = World::new(levels, requires_key)?;
        info!(seed = self.seed, levels = specs.len(), "new game ready");
        Ok(world)
    }
}

/// Generates a new game with the default carve tunables.
pub fn new_game(specs: &[LevelSpec], seed: u64) -> Result<World, BootstrapError> {
    Bootstrap::new(seed, CarveConfig::default()).new_game(specs)
}
