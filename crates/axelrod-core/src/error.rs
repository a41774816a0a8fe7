//! Error types for network construction and simulation queries.

use thiserror::Error;

/// Errors surfaced by network construction, dynamics, and analysis.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Topology parameters incompatible with the agent count
    #[error("Invalid topology configuration: {reason}")]
    InvalidTopologyConfig { reason: String },

    /// Construction parameter outside its valid range
    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    /// Convergence requested on a network with positive noise
    #[error("Convergence is not defined with noise {noise} > 0")]
    NoiseNonZero { noise: f64 },

    /// Convergence requested while an active edge joins two vaccinated
    /// agents
    #[error("Vaccinated agents {first} and {second} share a permanently active link")]
    FrozenActiveLink { first: usize, second: usize },

    /// Biggest-fragment query on a partition with no agents
    #[error("Fragment set is empty")]
    EmptyFragmentSet,

    /// Operation only defined for a topology the network was not built with
    #[error("Operation `{operation}` requires a square lattice topology")]
    UnsupportedTopology { operation: String },
}

impl SimError {
    /// Creates an InvalidTopologyConfig error.
    pub fn invalid_topology(reason: impl Into<String>) -> Self {
        Self::InvalidTopologyConfig {
            reason: reason.into(),
        }
    }

    /// Creates an InvalidParameter error.
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }

    /// Creates an UnsupportedTopology error.
    pub fn unsupported_topology(operation: impl Into<String>) -> Self {
        Self::UnsupportedTopology {
            operation: operation.into(),
        }
    }
}
