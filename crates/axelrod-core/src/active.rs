//! Active Links
//!
//! An edge is active when its endpoints are partially similar: they agree
//! on at least one feature but not on all of them. Active links are the
//! convergence criterion; a network without them can never change again
//! under noise-free dynamics.

use crate::network::Network;

impl Network {
    /// State test for a pair: true iff `0 < overlap < F`.
    ///
    /// Callers pair this with adjacency; the scan methods below only
    /// consider actual edges.
    pub fn is_active_pair(&self, i: usize, j: usize) -> bool {
        let overlap = self.agents[i].overlap(&self.agents[j]);
        overlap > 0 && overlap < self.feature_count()
    }

    /// True iff any edge in the graph is an active link. Short-circuits on
    /// the first hit.
    pub fn has_active_links(&self) -> bool {
        self.edges().any(|(i, j)| self.is_active_pair(i, j))
    }

    /// Number of active edges in the graph.
    pub fn active_link_count(&self) -> usize {
        self.edges()
            .filter(|&(i, j)| self.is_active_pair(i, j))
            .count()
    }

    /// First active edge whose endpoints are both vaccinated, if any.
    ///
    /// Such a link is permanent: neither endpoint can change its
    /// features, so no sequence of steps deactivates it.
    pub fn frozen_active_link(&self) -> Option<(usize, usize)> {
        self.edges().find(|&(i, j)| {
            self.agents[i].vaccinated
                && self.agents[j].vaccinated
                && self.is_active_pair(i, j)
        })
    }
}
