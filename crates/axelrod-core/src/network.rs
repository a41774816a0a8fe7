//! Networks
//!
//! The simulation's central state: the agent population, the interaction
//! graph, the run parameters, and the seeded random stream. Construction
//! is the only fallible phase; afterwards only feature vectors and
//! vaccination flags mutate.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use axelrod_report::GridSnapshot;

use crate::agent::Agent;
use crate::error::SimError;
use crate::topology::Topology;

/// A population of agents on a fixed interaction graph.
///
/// Agent indices are stable identities shared by the agent vector and the
/// adjacency lists. The random stream is owned by the network and seeded
/// once, so runs with equal parameters and seed replay exactly.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) agents: Vec<Agent>,
    pub(crate) adjacency: Vec<Vec<usize>>,
    topology: Topology,
    f: usize,
    q: u32,
    noise: f64,
    seed: u64,
    pub(crate) rng: SmallRng,
}

impl Network {
    /// Builds a network of `n` agents with `f` features over `q` trait
    /// values, on the given topology.
    ///
    /// Stream order is fixed: all feature draws first (agent 0 first,
    /// feature 0 first), then the topology build; random-regular sampling
    /// continues on the same stream.
    pub fn new(
        n: usize,
        f: usize,
        q: u32,
        topology: Topology,
        noise: f64,
        seed: u64,
    ) -> Result<Self, SimError> {
        if n == 0 {
            return Err(SimError::invalid_parameter("agent count must be positive"));
        }
        if f == 0 {
            return Err(SimError::invalid_parameter(
                "feature count must be positive",
            ));
        }
        if q == 0 {
            return Err(SimError::invalid_parameter("trait count must be positive"));
        }
        if !(0.0..=1.0).contains(&noise) {
            return Err(SimError::invalid_parameter(format!(
                "noise rate {} must lie in [0, 1]",
                noise
            )));
        }

        let mut rng = SmallRng::seed_from_u64(seed);

        let agents: Vec<Agent> = (0..n)
            .map(|_| Agent::new((0..f).map(|_| rng.gen_range(0..q)).collect()))
            .collect();

        let adjacency = topology.build_adjacency(n, &mut rng)?;

        Ok(Self {
            agents,
            adjacency,
            topology,
            f,
            q,
            noise,
            seed,
            rng,
        })
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// True when the network holds no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of features per agent.
    pub fn feature_count(&self) -> usize {
        self.f
    }

    /// Number of trait values per feature.
    pub fn trait_count(&self) -> u32 {
        self.q
    }

    /// Topology the graph was built with.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Noise rate in [0, 1].
    pub fn noise(&self) -> f64 {
        self.noise
    }

    /// Seed the run's stream started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Degree of agent `i`.
    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }

    /// Neighbor indices of agent `i`, sorted ascending.
    pub fn neighbors_of(&self, i: usize) -> &[usize] {
        &self.adjacency[i]
    }

    /// Agent `i`.
    pub fn agent_at(&self, i: usize) -> &Agent {
        &self.agents[i]
    }

    /// Mutable view of agent `i`.
    pub fn agent_at_mut(&mut self, i: usize) -> &mut Agent {
        &mut self.agents[i]
    }

    /// All agents in index order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Iterates each undirected edge once as `(i, j)` with `i < j`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, list)| {
            list.iter()
                .filter(move |&&j| i < j)
                .map(move |&j| (i, j))
        })
    }

    /// Fraction of features on which agents `i` and `j` agree.
    pub fn homophily(&self, i: usize, j: usize) -> f64 {
        self.agents[i].homophily(&self.agents[j])
    }

    /// Row-major matrix of every agent's first-feature value.
    ///
    /// Defined for square lattices only; cell `(row, col)` is agent
    /// `col + row * side`.
    pub fn first_feature_grid(&self) -> Result<GridSnapshot, SimError> {
        let side = self
            .topology
            .lattice_side(self.len())
            .ok_or_else(|| SimError::unsupported_topology("first_feature_grid"))?;

        let values = self.agents.iter().map(|agent| agent.features[0]).collect();
        Ok(GridSnapshot::new(side, values))
    }

    /// Row-major 0/1 matrix of vaccination flags, same shape as
    /// [`Network::first_feature_grid`].
    pub fn vaccinated_grid(&self) -> Result<GridSnapshot, SimError> {
        let side = self
            .topology
            .lattice_side(self.len())
            .ok_or_else(|| SimError::unsupported_topology("vaccinated_grid"))?;

        let values = self
            .agents
            .iter()
            .map(|agent| u32::from(agent.vaccinated))
            .collect();
        Ok(GridSnapshot::new(side, values))
    }
}
