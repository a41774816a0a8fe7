//! Configuration System
//!
//! Loads run parameters from a TOML file so sweeps can change populations
//! and topologies without recompiling. Every field has a default, so a
//! partial file (or none at all) still yields a runnable configuration.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::dynamics::DEFAULT_CHECK_INTERVAL;
use crate::error::SimError;
use crate::network::Network;
use crate::topology::Topology;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "axelrod.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model: ModelConfig,
    pub driver: DriverConfig,
}

/// Model construction parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub agents: usize,
    pub features: usize,
    pub traits: u32,
    pub topology: Topology,
    pub noise: f64,
    pub seed: u64,
}

/// Driver loop and output parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Steps between convergence checks
    pub check_interval: u64,
    /// Step-budget ceiling; unset means run until convergence
    pub max_steps: Option<u64>,
    /// Directory the result files are written into
    pub output_dir: String,
}

impl RunConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from `path`, or fall back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|e| {
            warn!(
                "Could not load {}: {}. Using defaults.",
                path.as_ref().display(),
                e
            );
            Self::default()
        })
    }
}

impl ModelConfig {
    /// Builds a network from these parameters.
    pub fn build(&self) -> Result<Network, SimError> {
        Network::new(
            self.agents,
            self.features,
            self.traits,
            self.topology,
            self.noise,
            self.seed,
        )
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            agents: 100,
            features: 10,
            traits: 60,
            topology: Topology::Cycle,
            noise: 0.0,
            seed: 123_457,
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            check_interval: DEFAULT_CHECK_INTERVAL,
            max_steps: None,
            output_dir: "output".to_string(),
        }
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
