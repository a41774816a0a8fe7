//! Topology Construction
//!
//! Builders for the interaction graphs the model runs on. Every builder
//! produces an undirected simple graph on vertices `0..n` as sorted
//! per-vertex adjacency lists; vertex identity is the agent index.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SimError;

/// Interaction graph family for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Topology {
    /// Edge between every pair of agents
    Complete,
    /// Square lattice with periodic boundaries, 4 orthogonal neighbors
    #[serde(rename = "lattice")]
    Lattice2d,
    /// Uniformly sampled simple regular graph
    RandomRegular { degree: usize },
    /// Ring: each agent connects to its two ring neighbors
    Cycle,
}

impl Topology {
    /// Family name as used in configuration and summaries.
    pub fn name(&self) -> &'static str {
        match self {
            Topology::Complete => "complete",
            Topology::Lattice2d => "lattice",
            Topology::RandomRegular { .. } => "random_regular",
            Topology::Cycle => "cycle",
        }
    }

    /// Builds the adjacency lists for `n` vertices.
    ///
    /// Only the random-regular family draws from `rng`; the other builders
    /// are deterministic in `n`.
    pub fn build_adjacency<R: Rng>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Vec<usize>>, SimError> {
        match self {
            Topology::Complete => Ok(complete_adjacency(n)),
            Topology::Lattice2d => lattice_adjacency(n),
            Topology::RandomRegular { degree } => random_regular_adjacency(*degree, n, rng),
            Topology::Cycle => Ok(cycle_adjacency(n)),
        }
    }

    /// Side length of the square lattice, when this is a lattice topology
    /// over `n` vertices.
    pub fn lattice_side(&self, n: usize) -> Option<usize> {
        match self {
            Topology::Lattice2d => integer_square_root(n),
            _ => None,
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::RandomRegular { degree } => write!(f, "random_regular({})", degree),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Returns the exact integer square root of `n`, if one exists.
fn integer_square_root(n: usize) -> Option<usize> {
    let side = (n as f64).sqrt().round() as usize;
    if side * side == n {
        Some(side)
    } else {
        None
    }
}

fn complete_adjacency(n: usize) -> Vec<Vec<usize>> {
    (0..n)
        .map(|i| (0..n).filter(|&j| j != i).collect())
        .collect()
}

fn cycle_adjacency(n: usize) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); n];
    for (i, list) in adjacency.iter_mut().enumerate() {
        let prev = (i + n - 1) % n;
        let next = (i + 1) % n;
        // Rings of one or two vertices degenerate to loops or a doubled
        // edge; those collapse here.
        for j in [prev, next] {
            if j != i && !list.contains(&j) {
                list.push(j);
            }
        }
        list.sort_unstable();
    }
    adjacency
}

fn lattice_adjacency(n: usize) -> Result<Vec<Vec<usize>>, SimError> {
    let side = integer_square_root(n).ok_or_else(|| {
        SimError::invalid_topology(format!("agent count {} is not a perfect square", n))
    })?;

    let mut adjacency = vec![Vec::new(); n];
    for row in 0..side {
        for col in 0..side {
            let i = col + row * side;
            let up = col + ((row + side - 1) % side) * side;
            let down = col + ((row + 1) % side) * side;
            let left = (col + side - 1) % side + row * side;
            let right = (col + 1) % side + row * side;
            for j in [up, down, left, right] {
                if j != i && !adjacency[i].contains(&j) {
                    adjacency[i].push(j);
                }
            }
            adjacency[i].sort_unstable();
        }
    }
    Ok(adjacency)
}

fn random_regular_adjacency<R: Rng>(
    degree: usize,
    n: usize,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>, SimError> {
    if degree >= n {
        return Err(SimError::invalid_topology(format!(
            "degree {} must be smaller than the agent count {}",
            degree, n
        )));
    }
    if (degree * n) % 2 != 0 {
        return Err(SimError::invalid_topology(format!(
            "degree {} times agent count {} must be even",
            degree, n
        )));
    }
    if degree == 0 {
        return Ok(vec![Vec::new(); n]);
    }

    // Pairing model: match stubs into edges in shuffled batches, carrying
    // rejected stubs forward, and restart the attempt when the leftover
    // stubs admit no further simple edge.
    loop {
        if let Some(adjacency) = try_stub_pairing(degree, n, rng) {
            return Ok(adjacency);
        }
    }
}

/// One pairing attempt; None means the attempt dead-ended and the caller
/// should restart with fresh stubs.
fn try_stub_pairing<R: Rng>(degree: usize, n: usize, rng: &mut R) -> Option<Vec<Vec<usize>>> {
    let mut edges: HashSet<(usize, usize)> = HashSet::new();
    let mut stubs: Vec<usize> = (0..n)
        .flat_map(|i| std::iter::repeat(i).take(degree))
        .collect();

    while !stubs.is_empty() {
        stubs.shuffle(rng);

        let mut leftover = Vec::new();
        for pair in stubs.chunks_exact(2) {
            let (a, b) = (pair[0].min(pair[1]), pair[0].max(pair[1]));
            if a != b && !edges.contains(&(a, b)) {
                edges.insert((a, b));
            } else {
                leftover.push(pair[0]);
                leftover.push(pair[1]);
            }
        }

        if !leftover.is_empty() && !has_suitable_edge(&edges, &leftover) {
            return None;
        }
        stubs = leftover;
    }

    let mut adjacency = vec![Vec::new(); n];
    for &(a, b) in &edges {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }
    for list in &mut adjacency {
        list.sort_unstable();
    }
    Some(adjacency)
}

/// Whether any pair of stub holders could still form a new simple edge.
fn has_suitable_edge(edges: &HashSet<(usize, usize)>, stubs: &[usize]) -> bool {
    let mut holders: Vec<usize> = stubs.to_vec();
    holders.sort_unstable();
    holders.dedup();

    for (idx, &a) in holders.iter().enumerate() {
        for &b in &holders[idx + 1..] {
            if !edges.contains(&(a, b)) {
                return true;
            }
        }
    }
    false
}
