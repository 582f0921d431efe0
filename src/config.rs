use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no `--config` is given
pub const CONFIG_FILE: &str = "covgate.toml";

pub const DEFAULT_SUMMARY_PATH: &str = "./coverage/coverage-summary.xml";
pub const DEFAULT_BASELINE_PATH: &str = "./coverage/coverage-report.json";
pub const DEFAULT_MINIMUM_PERCENTAGE: f64 = 75.0;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub check: CheckConfig,
}

/// Settings for `check-coverage`
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    /// Clover summary of the latest coverage run
    #[serde(default = "default_summary_path")]
    pub summary_path: PathBuf,
    /// JSON record of the last accepted coverage
    #[serde(default = "default_baseline_path")]
    pub baseline_path: PathBuf,
    /// Lowest PR coverage accepted for any category
    #[serde(default = "default_minimum_percentage")]
    pub minimum_percentage: f64,
}

fn default_summary_path() -> PathBuf {
    PathBuf::from(DEFAULT_SUMMARY_PATH)
}

fn default_baseline_path() -> PathBuf {
    PathBuf::from(DEFAULT_BASELINE_PATH)
}

fn default_minimum_percentage() -> f64 {
    DEFAULT_MINIMUM_PERCENTAGE
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            summary_path: default_summary_path(),
            baseline_path: default_baseline_path(),
            minimum_percentage: default_minimum_percentage(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Load an explicit config file, else `covgate.toml` in `base_dir` if present, else defaults.
    pub fn discover(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = base_dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        let minimum = self.check.minimum_percentage;
        if !minimum.is_finite() || minimum < 0.0 {
            anyhow::bail!(
                "minimum_percentage must be a non-negative number, got {}",
                minimum
            );
        }

        Ok(())
    }
}
