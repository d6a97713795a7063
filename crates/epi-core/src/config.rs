//! Configuration System
//!
//! Loads run parameters from a TOML file so they can be adjusted without
//! recompiling. Every section and field is optional; anything missing falls
//! back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WorldError;
use crate::world::WorldParams;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "epidemic.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub world: WorldConfig,
    pub disease: DiseaseConfig,
    pub output: OutputConfig,
}

/// Run control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
    pub max_ticks: u64,
    /// Maximum per-axis displacement per tick
    pub movement: i32,
    /// End the run early once no infected agents remain
    pub stop_when_extinct: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_ticks: 10,
            movement: 5,
            stop_when_extinct: true,
        }
    }
}

/// Plane and population size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub population: usize,
    pub width: i32,
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            population: 100,
            width: 100,
            height: 100,
        }
    }
}

/// Disease parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiseaseConfig {
    pub initial_infected: usize,
    /// How far infection spreads to neighbours
    pub contact_radius: f64,
    pub infection_prob: f64,
    pub recover_prob: f64,
    pub death_prob: f64,
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            initial_infected: 5,
            contact_radius: 15.0,
            infection_prob: 0.8,
            recover_prob: 0.7,
            death_prob: 0.4,
        }
    }
}

/// Output files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Master switch; when false nothing is written to disk
    pub enabled: bool,
    pub dir: PathBuf,
    /// Ticks between periodic snapshots (0 = only first and last)
    pub snapshot_interval: u64,
    pub write_events: bool,
    pub write_stats: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("output"),
            snapshot_interval: 0,
            write_events: true,
            write_stats: true,
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::read(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults if the file does not exist.
    ///
    /// The result is parsed but not validated, so command-line overrides can
    /// still be applied; call [`Config::validate`] afterwards. A file that
    /// exists but fails to parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::read(path)
        } else {
            tracing::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse a TOML string without validating it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse and validate configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config = Self::parse(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML (used to print a starter config).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Kernel parameters assembled from the world and disease sections.
    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            population: self.world.population,
            width: self.world.width,
            height: self.world.height,
            initial_infected: self.disease.initial_infected,
            contact_radius: self.disease.contact_radius,
            infection_prob: self.disease.infection_prob,
            recover_prob: self.disease.recover_prob,
            death_prob: self.disease.death_prob,
        }
    }

    /// Check everything the kernel would reject, before any world is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world_params().validate()?;
        if self.simulation.movement < 0 {
            return Err(WorldError::InvalidParameter {
                name: "movement",
                reason: format!("must not be negative, got {}", self.simulation.movement),
            }
            .into());
        }
        Ok(())
    }
}

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] WorldError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.max_ticks, 10);
        assert_eq!(config.world.population, 100);
        assert_eq!(config.disease.initial_infected, 5);
        assert!(config.validate().is_ok());
        assert_eq!(config.world_params(), WorldParams::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_str(
            r#"
            [simulation]
            seed = 7
            max_ticks = 250

            [disease]
            infection_prob = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.simulation.max_ticks, 250);
        assert_eq!(config.simulation.movement, 5);
        assert_eq!(config.disease.infection_prob, 0.25);
        assert_eq!(config.disease.recover_prob, 0.7);
        assert_eq!(config.world.width, 100);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let err = Config::from_str("[disease]\nrecover_prob = 2.0\n").unwrap_err();
        match err {
            ConfigError::Invalid(e) => assert_eq!(e.parameter(), "recover_prob"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_movement_rejected() {
        let err = Config::from_str("[simulation]\nmovement = -3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref e) if e.parameter() == "movement"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Config::from_str("[world\npopulation = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip_of_defaults() {
        let mut config = Config::default();
        config.simulation.seed = Some(99);
        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = Config::load_or_default("definitely/not/here.toml").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_defers_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epidemic.toml");
        fs::write(&path, "[world]\npopulation = 3\n").unwrap();

        // Five initial infections exceed a population of three.
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));

        let mut config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.world.population, 3);
        config.disease.initial_infected = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_still_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epidemic.toml");
        fs::write(&path, "[world\n").unwrap();

        assert!(matches!(Config::load_or_default(&path), Err(ConfigError::Parse(_))));
    }
}
