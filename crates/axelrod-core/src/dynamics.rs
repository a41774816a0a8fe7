//! Dynamics
//!
//! The asynchronous stochastic update rule and the convergence loops built
//! on top of it. One step touches at most one agent; steps run strictly
//! sequentially on the network's single random stream.

use rand::Rng;
use tracing::debug;

use crate::error::SimError;
use crate::network::Network;

/// Default number of steps between convergence checks.
pub const DEFAULT_CHECK_INTERVAL: u64 = 1000;

/// How a bounded convergence run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceOutcome {
    /// No active links remain after the contained number of steps
    Converged(u64),
    /// The step budget ran out with active links still present
    BudgetExhausted(u64),
}

impl ConvergenceOutcome {
    /// Steps executed in the run.
    pub fn steps(&self) -> u64 {
        match self {
            ConvergenceOutcome::Converged(steps) => *steps,
            ConvergenceOutcome::BudgetExhausted(steps) => *steps,
        }
    }

    /// True when the run ended with no active links.
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceOutcome::Converged(_))
    }
}

impl Network {
    /// Runs one asynchronous update step.
    ///
    /// Draw order is fixed: agent, neighbor, noise coin, then either the
    /// mutation draws (feature, trait) or the interaction draws
    /// (acceptance coin, differing-feature pick). An isolated agent ends
    /// the step after the agent draw; an overlap of zero or F ends it
    /// after the noise coin. Vaccinated agents consume the same draws but
    /// the final write is suppressed.
    pub fn step(&mut self) {
        let n = self.agents.len();
        let i = self.rng.gen_range(0..n);

        let degree = self.adjacency[i].len();
        if degree == 0 {
            return;
        }
        let pick = self.rng.gen_range(0..degree);
        let j = self.adjacency[i][pick];

        let noise_coin: f64 = self.rng.gen();
        if noise_coin < self.noise() {
            let f = self.feature_count();
            let q = self.trait_count();
            let k = self.rng.gen_range(0..f);
            let value = self.rng.gen_range(0..q);
            if !self.agents[i].vaccinated {
                self.agents[i].features[k] = value;
            }
            return;
        }

        let overlap = self.agents[i].overlap(&self.agents[j]);
        let f = self.feature_count();
        if overlap == 0 || overlap == f {
            return;
        }

        let interaction_coin: f64 = self.rng.gen();
        if interaction_coin < overlap as f64 / f as f64 {
            let differing = self.agents[i].differing_features(&self.agents[j]);
            let k = differing[self.rng.gen_range(0..differing.len())];
            let value = self.agents[j].features[k];
            if !self.agents[i].vaccinated {
                self.agents[i].features[k] = value;
            }
        }
    }

    /// Runs `steps` update steps back to back.
    pub fn evolve(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Evolves until no active links remain, checking every
    /// `check_interval` steps (an interval of 0 is rounded up to 1).
    /// Returns the total number of steps executed; a network with no
    /// active links at entry reports 0.
    ///
    /// Noise must be zero: mutation can always re-create active links, so
    /// the loop would be unbounded. An active link between two vaccinated
    /// agents is refused the same way; neither endpoint can change, so
    /// the link outlives any number of steps. Use
    /// [`Network::evolve_to_convergence_bounded`] in either case.
    pub fn evolve_to_convergence(&mut self, check_interval: u64) -> Result<u64, SimError> {
        if self.noise() > 0.0 {
            return Err(SimError::NoiseNonZero {
                noise: self.noise(),
            });
        }
        if let Some((first, second)) = self.frozen_active_link() {
            return Err(SimError::FrozenActiveLink { first, second });
        }

        let batch = check_interval.max(1);
        let mut steps = 0u64;
        while self.has_active_links() {
            self.evolve(batch);
            steps += batch;
            debug!(
                "{} steps run, {} active links remain",
                steps,
                self.active_link_count()
            );
        }
        Ok(steps)
    }

    /// Evolves toward convergence with a step-budget ceiling.
    ///
    /// Unlike [`Network::evolve_to_convergence`] this accepts positive
    /// noise; the budget is the termination guarantee.
    pub fn evolve_to_convergence_bounded(
        &mut self,
        check_interval: u64,
        max_steps: u64,
    ) -> ConvergenceOutcome {
        let batch = check_interval.max(1);
        let mut steps = 0u64;

        while steps < max_steps {
            if !self.has_active_links() {
                return ConvergenceOutcome::Converged(steps);
            }
            let chunk = batch.min(max_steps - steps);
            self.evolve(chunk);
            steps += chunk;
            debug!("{} of {} budgeted steps run", steps, max_steps);
        }

        if self.has_active_links() {
            ConvergenceOutcome::BudgetExhausted(steps)
        } else {
            ConvergenceOutcome::Converged(steps)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Topology;

    /// Cycle of four agents with two binary features, forced into a state
    /// where all four edges are active.
    fn all_active_ring(noise: f64) -> Network {
        let mut network = Network::new(4, 2, 2, Topology::Cycle, noise, 7).unwrap();
        let states = [[0, 0], [0, 1], [1, 1], [1, 0]];
        for (i, state) in states.iter().enumerate() {
            network.agent_at_mut(i).features = state.to_vec();
        }
        network
    }

    /// Two vaccinated neighbors that disagree on one of two features, so
    /// their shared edge is active and neither side can ever assimilate.
    fn frozen_pair() -> Network {
        let mut network = Network::new(2, 2, 2, Topology::Cycle, 0.0, 21).unwrap();
        network.agent_at_mut(0).features = vec![0, 0];
        network.agent_at_mut(1).features = vec![0, 1];
        for i in 0..2 {
            network.agent_at_mut(i).vaccinated = true;
        }
        network
    }

    #[test]
    fn test_isolated_agents_never_change() {
        let topology = Topology::RandomRegular { degree: 0 };
        let mut network = Network::new(5, 3, 10, topology, 1.0, 42).unwrap();
        let before = network.agents().to_vec();

        network.evolve(50);

        assert_eq!(network.agents(), before.as_slice());
    }

    #[test]
    fn test_evolve_is_deterministic() {
        let mut a = Network::new(20, 4, 6, Topology::Complete, 0.0, 2024).unwrap();
        let mut b = Network::new(20, 4, 6, Topology::Complete, 0.0, 2024).unwrap();

        a.evolve(500);
        b.evolve(500);

        assert_eq!(a.agents(), b.agents());
    }

    #[test]
    fn test_interaction_only_assimilates() {
        // A copy step always moves the chosen agent toward its neighbor,
        // so a partially similar pair must end identical.
        let mut network = Network::new(2, 2, 2, Topology::Cycle, 0.0, 5).unwrap();
        network.agent_at_mut(0).features = vec![0, 0];
        network.agent_at_mut(1).features = vec![0, 1];

        let steps = network.evolve_to_convergence(1).unwrap();

        assert!(steps > 0);
        assert_eq!(network.agent_at(0), network.agent_at(1));
    }

    #[test]
    fn test_vaccinated_agents_frozen() {
        let mut network = Network::new(2, 5, 50, Topology::Complete, 1.0, 42).unwrap();
        network.agent_at_mut(0).vaccinated = true;
        network.agent_at_mut(1).vaccinated = true;
        let before: Vec<Vec<u32>> = network
            .agents()
            .iter()
            .map(|agent| agent.features.clone())
            .collect();

        network.evolve(200);

        for (agent, features) in network.agents().iter().zip(&before) {
            assert_eq!(&agent.features, features);
        }
    }

    #[test]
    fn test_vaccinated_agent_anchors_consensus() {
        // The frozen agent never assimilates, so the only absorbing state
        // is the one where its neighbor copied from it.
        let mut network = Network::new(2, 2, 2, Topology::Cycle, 0.0, 21).unwrap();
        network.agent_at_mut(0).vaccinated = true;
        network.agent_at_mut(0).features = vec![0, 0];
        network.agent_at_mut(1).features = vec![0, 1];

        network.evolve_to_convergence(1).unwrap();

        assert_eq!(network.agent_at(0).features, vec![0, 0]);
        assert_eq!(network.agent_at(1).features, vec![0, 0]);
    }

    #[test]
    fn test_mutation_changes_unvaccinated() {
        let mut network = Network::new(2, 5, 50, Topology::Complete, 1.0, 42).unwrap();
        let before: Vec<Vec<u32>> = network
            .agents()
            .iter()
            .map(|agent| agent.features.clone())
            .collect();

        network.evolve(200);

        let after: Vec<Vec<u32>> = network
            .agents()
            .iter()
            .map(|agent| agent.features.clone())
            .collect();
        assert_ne!(before, after, "200 mutation steps left no trace");
    }

    #[test]
    fn test_convergence_rejects_noise() {
        let mut network = Network::new(10, 3, 5, Topology::Cycle, 0.2, 1).unwrap();
        let before = network.agents().to_vec();

        let result = network.evolve_to_convergence(100);

        assert!(matches!(result, Err(SimError::NoiseNonZero { .. })));
        assert_eq!(network.agents(), before.as_slice(), "steps ran after the error");
    }

    #[test]
    fn test_convergence_rejects_frozen_pair() {
        let mut network = frozen_pair();
        let before = network.agents().to_vec();

        let result = network.evolve_to_convergence(1);

        assert_eq!(
            result,
            Err(SimError::FrozenActiveLink { first: 0, second: 1 })
        );
        assert_eq!(network.agents(), before.as_slice(), "steps ran after the error");
    }

    #[test]
    fn test_convergence_zero_steps_when_uniform() {
        // A single trait value per feature makes every agent identical
        // from construction, so no active links exist at entry.
        let mut network = Network::new(12, 3, 1, Topology::Complete, 0.0, 9).unwrap();
        let steps = network.evolve_to_convergence(1000).unwrap();
        assert_eq!(steps, 0);
    }

    #[test]
    fn test_convergence_counts_whole_batches() {
        let mut network = all_active_ring(0.0);
        let steps = network.evolve_to_convergence(7).unwrap();
        assert!(steps > 0);
        assert_eq!(steps % 7, 0);
        assert!(!network.has_active_links());
    }

    #[test]
    fn test_convergence_zero_interval_terminates() {
        let mut network = all_active_ring(0.0);
        let steps = network.evolve_to_convergence(0).unwrap();
        assert!(steps > 0);
        assert!(!network.has_active_links());
    }

    #[test]
    fn test_bounded_budget_exhausted() {
        // One step rewrites one feature and can deactivate at most the two
        // edges of the touched agent, so four active edges cannot clear in
        // a single step.
        let mut network = all_active_ring(0.0);
        let outcome = network.evolve_to_convergence_bounded(1000, 1);
        assert_eq!(outcome, ConvergenceOutcome::BudgetExhausted(1));
        assert!(!outcome.is_converged());
    }

    #[test]
    fn test_bounded_frozen_pair_exhausts_budget() {
        // No finite budget clears the frozen link; the bounded loop must
        // stop at the ceiling with the state untouched.
        let mut network = frozen_pair();
        let before = network.agents().to_vec();

        let outcome = network.evolve_to_convergence_bounded(100, 5_000);

        assert_eq!(outcome, ConvergenceOutcome::BudgetExhausted(5_000));
        assert!(network.has_active_links());
        assert_eq!(network.agents(), before.as_slice());
    }

    #[test]
    fn test_bounded_accepts_noise() {
        let mut network = all_active_ring(0.5);
        let outcome = network.evolve_to_convergence_bounded(1000, 1);
        assert_eq!(outcome, ConvergenceOutcome::BudgetExhausted(1));
        assert_eq!(outcome.steps(), 1);
    }

    #[test]
    fn test_bounded_reports_convergence() {
        let mut network = all_active_ring(0.0);
        let outcome = network.evolve_to_convergence_bounded(10, 1_000_000);
        assert!(outcome.is_converged());
        assert!(!network.has_active_links());
        assert!(outcome.steps() > 0);
        assert!(outcome.steps() <= 1_000_000);
    }

    #[test]
    fn test_bounded_converged_at_entry() {
        let mut network = Network::new(9, 2, 1, Topology::Lattice2d, 0.0, 4).unwrap();
        let outcome = network.evolve_to_convergence_bounded(100, 10_000);
        assert_eq!(outcome, ConvergenceOutcome::Converged(0));
    }
}
