//! TOML run configuration.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use maze_escape_core::{LevelSpec, MIN_LEVEL_DIMENSION};
use maze_escape_system_level_generation::{CarveConfig, StallPolicy, DEFAULT_STEP_LIMIT};
use serde::Deserialize;

/// Run configuration loaded from disk or defaulted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Run seed; drawn from entropy when absent.
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    #[serde(default)]
    generation: GenerationSection,
    /// Ordered level requests.
    #[serde(default = "default_levels")]
    pub(crate) levels: Vec<LevelSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct GenerationSection {
    step_limit: u64,
    stall_policy: StallPolicySetting,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            stall_policy: StallPolicySetting::Complete,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum StallPolicySetting {
    Complete,
    Fail,
}

impl From<StallPolicySetting> for StallPolicy {
    fn from(setting: StallPolicySetting) -> Self {
        match setting {
            StallPolicySetting::Complete => StallPolicy::Complete,
            StallPolicySetting::Fail => StallPolicy::Fail,
        }
    }
}

fn default_levels() -> Vec<LevelSpec> {
    vec![
        LevelSpec::new(19, 11, 1, false),
        LevelSpec::new(19, 11, 2, false),
        LevelSpec::new(19, 11, 3, true),
        LevelSpec::new(19, 11, 50, true),
    ]
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            generation: GenerationSection::default(),
            levels: default_levels(),
        }
    }
}

impl GameConfig {
    /// Reads and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.levels.is_empty() {
            bail!("config must request at least one level");
        }
        for (index, spec) in self.levels.iter().enumerate() {
            if spec.width < MIN_LEVEL_DIMENSION || spec.height < MIN_LEVEL_DIMENSION {
                bail!(
                    "level {index} is {}x{}; both dimensions must be at least {MIN_LEVEL_DIMENSION}",
                    spec.width,
                    spec.height
                );
            }
            if spec.candidates == 0 {
                bail!("level {index} must generate at least one candidate");
            }
        }
        Ok(())
    }

    /// Carve tunables derived from the `[generation]` table.
    pub(crate) fn carve_config(&self) -> CarveConfig {
        CarveConfig::new(
            self.generation.step_limit,
            self.generation.stall_policy.into(),
        )
    }
}
