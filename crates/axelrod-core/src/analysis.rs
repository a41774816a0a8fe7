//! Homophily Statistics
//!
//! Global similarity metrics computed over the whole population,
//! independent of the network's edge structure.

use crate::network::Network;

impl Network {
    /// Arithmetic mean of pairwise homophily over all unordered agent
    /// pairs, adjacent or not. O(N²·F). A single-agent network reports
    /// 1.0 (an agent agrees with itself on everything).
    pub fn mean_homophily(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 1.0;
        }

        let mut total = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                total += self.homophily(i, j);
            }
        }
        total / (n * (n - 1) / 2) as f64
    }
}
