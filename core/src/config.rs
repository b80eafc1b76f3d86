//! Configuration module

use crate::error::ConfigError;
use crate::types::{Mode, OutputUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "LISTBENCH_CONFIG";

/// Config file used when `LISTBENCH_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/listbench.json";

/// Smallest allowed upper bound of the boxed integer cache
pub const MIN_BOX_CACHE_MAX: i32 = 127;

/// Largest allowed upper bound; the cache allocates one box per value
pub const MAX_BOX_CACHE_MAX: i32 = 1 << 24;

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Case or suite names to run; empty runs everything
    pub include: Vec<String>,

    /// Separate processes to average across; 0 runs one fork in-process
    pub forks: u32,

    /// Untimed priming iterations per fork
    pub warmup_iterations: u32,

    /// Timed iterations per fork
    pub measurement_iterations: u32,

    /// Wall-clock budget of one iteration
    pub iteration_time_ms: u64,

    /// Overrides the modes each case declares
    pub mode: Option<Mode>,

    /// Overrides the unit each case declares
    pub output_unit: Option<OutputUnit>,

    /// Flags handed to every fork
    pub runtime: RuntimeFlags,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Per-fork runtime tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeFlags {
    /// Upper bound (inclusive) of the shared boxed integer cache
    pub box_cache_max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_output: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            include: vec![],
            forks: 1,
            warmup_iterations: 5,
            measurement_iterations: 5,
            iteration_time_ms: 1_000,
            mode: None,
            output_unit: None,
            runtime: RuntimeFlags::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RuntimeFlags {
    fn default() -> Self {
        Self { box_cache_max: MIN_BOX_CACHE_MAX }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_output: false,
        }
    }
}

impl BenchConfig {
    /// Load config from the file named by `LISTBENCH_CONFIG`.
    /// `None` when the file does not exist.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let config_path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        if config_path.exists() {
            Self::load(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject counts and flags the harness cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.measurement_iterations == 0 {
            return Err(ConfigError::NoMeasurementIterations);
        }
        if self.runtime.box_cache_max < MIN_BOX_CACHE_MAX {
            return Err(ConfigError::BoxCacheTooSmall {
                min: MIN_BOX_CACHE_MAX,
                got: self.runtime.box_cache_max,
            });
        }
        if self.runtime.box_cache_max > MAX_BOX_CACHE_MAX {
            return Err(ConfigError::BoxCacheTooLarge {
                max: MAX_BOX_CACHE_MAX,
                got: self.runtime.box_cache_max,
            });
        }
        Ok(())
    }

    /// Number of fork runs per case and mode
    pub fn fork_runs(&self) -> u32 {
        self.forks.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(BenchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_measurement_rejected() {
        let config = BenchConfig {
            measurement_iterations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoMeasurementIterations)));
    }

    #[test]
    fn test_small_box_cache_rejected() {
        let mut config = BenchConfig::default();
        config.runtime.box_cache_max = 10;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoxCacheTooSmall { min: 127, got: 10 })
        ));
    }

    #[test]
    fn test_huge_box_cache_rejected() {
        let mut config = BenchConfig::default();
        config.runtime.box_cache_max = i32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoxCacheTooLarge { got: i32::MAX, .. })
        ));

        config.runtime.box_cache_max = MAX_BOX_CACHE_MAX;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: BenchConfig = serde_json::from_str(r#"{"forks": 3, "mode": "average-time"}"#).unwrap();
        assert_eq!(config.forks, 3);
        assert_eq!(config.mode, Some(Mode::AverageTime));
        assert_eq!(config.measurement_iterations, 5);
        assert_eq!(config.runtime.box_cache_max, 127);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listbench.json");

        let mut config = BenchConfig::default();
        config.include = vec!["append-array".to_string()];
        config.output_unit = Some(OutputUnit::Milliseconds);
        config.save(&path).unwrap();

        assert_eq!(BenchConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = BenchConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_forks_zero_runs_once() {
        let config = BenchConfig { forks: 0, ..Default::default() };
        assert_eq!(config.fork_runs(), 1);
    }
}
