//! Agents
//!
//! Leaf data entity holding one agent's cultural state. Adjacency lives in
//! the network, fragment labels in the analyzer output; the agent itself is
//! just the mutable feature vector plus a vaccination flag.

/// One agent's cultural state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Trait value per feature, each in [0, Q)
    pub features: Vec<u32>,
    /// Whether this agent is immune to feature updates
    pub vaccinated: bool,
}

impl Agent {
    /// Creates an unvaccinated agent with the given feature vector.
    pub fn new(features: Vec<u32>) -> Self {
        Self {
            features,
            vaccinated: false,
        }
    }

    /// Number of features.
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Number of features on which this agent and `other` agree.
    pub fn overlap(&self, other: &Agent) -> usize {
        self.features
            .iter()
            .zip(other.features.iter())
            .filter(|(a, b)| a == b)
            .count()
    }

    /// Fraction of features on which this agent and `other` agree.
    pub fn homophily(&self, other: &Agent) -> f64 {
        self.overlap(other) as f64 / self.features.len() as f64
    }

    /// Indices of the features where this agent and `other` differ.
    pub fn differing_features(&self, other: &Agent) -> Vec<usize> {
        self.features
            .iter()
            .zip(other.features.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(k, _)| k)
            .collect()
    }
}
