//! Axelrod model of cultural dissemination.
//!
//! Agents carry feature vectors and copy traits from neighbors with a
//! probability given by their cultural overlap. This crate holds the
//! network state, the update dynamics, and the measurements taken on
//! the final configuration (fragments, homophily, active links).

pub mod active;
pub mod agent;
pub mod analysis;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod fragments;
pub mod network;
pub mod topology;

// Re-export model state types
pub use agent::Agent;
pub use network::Network;
pub use topology::Topology;

// Re-export dynamics types
pub use dynamics::{ConvergenceOutcome, DEFAULT_CHECK_INTERVAL};

// Re-export measurement types
pub use fragments::FragmentPartition;

// Re-export configuration types
pub use config::{
    ConfigError, DriverConfig, ModelConfig, RunConfig, DEFAULT_CONFIG_PATH,
};

pub use error::SimError;
