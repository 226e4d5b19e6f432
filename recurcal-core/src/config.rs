//! Engine configuration at ~/.config/recurcal/config.toml
//!
//! Values are layered: built-in defaults, then the config file, then
//! `RECURCAL_`-prefixed environment variables (`RECURCAL_EXPANSION__MAX_INSTANCES`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};
use crate::recurrence::{DEFAULT_HORIZON_DAYS, DEFAULT_MAX_INSTANCES, ExpansionBound};

static DEFAULT_LOG_LEVEL: &str = "warn";
static ENV_PREFIX: &str = "RECURCAL";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    pub expansion: ExpansionConfig,
    pub logging: LoggingConfig,
}

/// Safety bound applied to every expansion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExpansionConfig {
    pub max_instances: usize,
    pub horizon_days: u32,
}

impl ExpansionConfig {
    pub fn bound(&self) -> ExpansionBound {
        ExpansionBound {
            max_instances: self.max_instances,
            horizon_days: self.horizon_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. "info" or "recurcal_core=trace"
    pub level: String,
}

impl EngineConfig {
    pub fn config_path() -> CoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CoreError::Config("Could not determine config directory".into()))?
            .join("recurcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location. A missing file means defaults.
    pub fn load() -> CoreResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> CoreResult<Self> {
        Self::load_layered(path, ENV_PREFIX)
    }

    fn load_layered(path: &Path, env_prefix: &str) -> CoreResult<Self> {
        let config: EngineConfig = Config::builder()
            .set_default("expansion.max_instances", DEFAULT_MAX_INSTANCES as u64)
            .and_then(|b| b.set_default("expansion.horizon_days", u64::from(DEFAULT_HORIZON_DAYS)))
            .and_then(|b| b.set_default("logging.level", DEFAULT_LOG_LEVEL))
            .map_err(|e| CoreError::Config(e.to_string()))?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        if config.expansion.max_instances == 0 {
            return Err(CoreError::Config(
                "expansion.max_instances must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CoreResult<()> {
        let contents = format!(
            "\
# recurcal configuration

[expansion]
# Most instances a single recurring event may expand to:
# max_instances = {DEFAULT_MAX_INSTANCES}

# How far past the first occurrence open-ended series are expanded, in days:
# horizon_days = {DEFAULT_HORIZON_DAYS}

[logging]
# Log filter (RUST_LOG syntax):
# level = \"{DEFAULT_LOG_LEVEL}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoreError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }
}
