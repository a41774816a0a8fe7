//! Fragments
//!
//! Connected components of agents with identical feature vectors, the
//! "cultural domains" the dynamics fragment the population into. Labels
//! are analyzer output carried by the partition; agents stay unlabeled.

use crate::error::SimError;
use crate::network::Network;

/// Partition of the agents into cultural fragments.
///
/// Two agents share a fragment only if they are connected through graph
/// edges whose endpoints hold exactly equal feature vectors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FragmentPartition {
    /// Fragment label per agent
    labels: Vec<usize>,
    /// Fragment sizes indexed by label
    sizes: Vec<usize>,
}

impl FragmentPartition {
    /// Number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.sizes.len()
    }

    /// Fragment sizes in label order.
    ///
    /// Labels are assigned by first appearance over agent index order, so
    /// this sequence is stable for serialization.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Label of agent `i`.
    pub fn label_of(&self, i: usize) -> usize {
        self.labels[i]
    }

    /// Labels for all agents in index order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Label and size of the largest fragment.
    ///
    /// Ties between equal maximal sizes resolve to the lowest label as an
    /// artifact of the scan; only the size is a stable contract.
    pub fn biggest(&self) -> Result<(usize, usize), SimError> {
        let mut best: Option<(usize, usize)> = None;
        for (label, &size) in self.sizes.iter().enumerate() {
            match best {
                Some((_, best_size)) if size <= best_size => {}
                _ => best = Some((label, size)),
            }
        }
        best.ok_or(SimError::EmptyFragmentSet)
    }
}

impl Network {
    /// Computes the fragment partition of the current state.
    ///
    /// Union-find over the edges whose endpoints are state-identical,
    /// then one renumbering pass over the agents.
    pub fn fragments(&self) -> FragmentPartition {
        let n = self.len();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut size = vec![1usize; n];

        for (i, j) in self.edges() {
            if self.agent_at(i).features == self.agent_at(j).features {
                union(&mut parent, &mut size, i, j);
            }
        }

        // Renumber roots by first appearance so label order is stable.
        let mut labels = vec![0usize; n];
        let mut sizes = Vec::new();
        let mut root_label: Vec<Option<usize>> = vec![None; n];
        for (i, slot) in labels.iter_mut().enumerate() {
            let root = find(&mut parent, i);
            *slot = match root_label[root] {
                Some(label) => label,
                None => {
                    let label = sizes.len();
                    root_label[root] = Some(label);
                    sizes.push(size[root]);
                    label
                }
            };
        }

        FragmentPartition { labels, sizes }
    }

    /// Label and size of the largest fragment of the current state.
    ///
    /// Convenience over [`Network::fragments`]; recomputes the partition.
    pub fn biggest_fragment(&self) -> Result<(usize, usize), SimError> {
        self.fragments().biggest()
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], size: &mut [usize], a: usize, b: usize) {
    let mut root_a = find(parent, a);
    let mut root_b = find(parent, b);
    if root_a == root_b {
        return;
    }
    // Union by size keeps the trees shallow
    if size[root_a] < size[root_b] {
        std::mem::swap(&mut root_a, &mut root_b);
    }
    parent[root_b] = root_a;
    size[root_a] += size[root_b];
}
