//! Run Summaries
//!
//! JSON summaries of completed simulation runs: parameters, step counts,
//! and the final fragment/homophily census.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use uuid::Uuid;

use crate::error::ReportError;

/// Construction parameters echoed into a run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParameters {
    /// Number of agents
    pub agents: usize,
    /// Number of cultural features per agent
    pub features: usize,
    /// Number of trait values per feature
    pub traits: u32,
    /// Topology name as configured
    pub topology: String,
    /// Noise rate in [0, 1]
    pub noise: f64,
    /// Seed for the run's random stream
    pub seed: u64,
}

impl RunParameters {
    /// Creates a new parameter block.
    pub fn new(
        agents: usize,
        features: usize,
        traits: u32,
        topology: impl Into<String>,
        noise: f64,
        seed: u64,
    ) -> Self {
        Self {
            agents,
            features,
            traits,
            topology: topology.into(),
            noise,
            seed,
        }
    }
}

/// Summary of one simulation run, serialized to JSON for later analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier for this run
    pub run_id: String,
    /// Parameters the network was built with
    pub parameters: RunParameters,
    /// Total dynamics steps executed
    pub steps: u64,
    /// Whether the run reached an active-link-free state
    pub converged: bool,
    /// Number of cultural fragments at the end of the run
    pub fragment_count: usize,
    /// Size of the largest fragment
    pub biggest_fragment_size: usize,
    /// Mean homophily over all unordered agent pairs
    pub mean_homophily: f64,
    /// Number of active links remaining
    pub active_links: usize,
}

impl RunSummary {
    /// Creates a new summary with a generated run id and zeroed census
    /// fields.
    pub fn new(parameters: RunParameters, steps: u64, converged: bool) -> Self {
        Self {
            run_id: generate_run_id(),
            parameters,
            steps,
            converged,
            fragment_count: 0,
            biggest_fragment_size: 0,
            mean_homophily: 0.0,
            active_links: 0,
        }
    }

    /// Sets the fragment census fields.
    pub fn with_fragments(mut self, count: usize, biggest: usize) -> Self {
        self.fragment_count = count;
        self.biggest_fragment_size = biggest;
        self
    }

    /// Sets the mean homophily.
    pub fn with_mean_homophily(mut self, value: f64) -> Self {
        self.mean_homophily = value;
        self
    }

    /// Sets the remaining active-link count.
    pub fn with_active_links(mut self, count: usize) -> Self {
        self.active_links = count;
        self
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes to compact JSON (single line).
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserializes from JSON.
    pub fn from_json(json: &str) -> Result<Self, ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes pretty-printed JSON to a file at `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Generates a unique run identifier.
pub fn generate_run_id() -> String {
    format!("run_{}", Uuid::new_v4())
}
