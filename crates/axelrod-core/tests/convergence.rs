//! Convergence and census tests
//!
//! End-to-end runs over the supported topologies, checking the properties
//! that hold for any converged configuration, plus the file exports the
//! driver produces from a finished run.

use std::fs;

use axelrod_core::{Network, RunConfig, Topology};
use axelrod_report::{FragmentRecord, RunParameters, RunSummary};
use tempfile::tempdir;

/// Test that every constructed agent carries F traits, each below Q
#[test]
fn test_feature_vectors_in_range() {
    let cases = [
        (Network::new(12, 4, 7, Topology::Complete, 0.0, 1), 4usize, 7u32),
        (Network::new(16, 3, 5, Topology::Lattice2d, 0.0, 2), 3, 5),
        (
            Network::new(10, 2, 9, Topology::RandomRegular { degree: 4 }, 0.0, 3),
            2,
            9,
        ),
        (Network::new(9, 5, 2, Topology::Cycle, 0.0, 4), 5, 2),
    ];

    for (network, f, q) in cases {
        let network = network.unwrap();
        for agent in network.agents() {
            assert_eq!(agent.features.len(), f);
            assert!(agent.features.iter().all(|&value| value < q));
        }
    }
}

/// Test the degree sequence of each topology builder
#[test]
fn test_degree_sequences() {
    let complete = Network::new(7, 2, 3, Topology::Complete, 0.0, 10).unwrap();
    assert!((0..7).all(|i| complete.degree(i) == 6));

    let cycle = Network::new(5, 2, 3, Topology::Cycle, 0.0, 11).unwrap();
    assert!((0..5).all(|i| cycle.degree(i) == 2));

    let regular =
        Network::new(10, 2, 3, Topology::RandomRegular { degree: 4 }, 0.0, 12).unwrap();
    assert!((0..10).all(|i| regular.degree(i) == 4));

    let lattice = Network::new(16, 2, 3, Topology::Lattice2d, 0.0, 13).unwrap();
    assert!((0..16).all(|i| lattice.degree(i) == 4));
}

/// Test that a noiseless run reaches a state with no active links
#[test]
fn test_convergence_terminates_without_noise() {
    let mut network = Network::new(10, 3, 4, Topology::Complete, 0.0, 2024).unwrap();

    let steps = network.evolve_to_convergence(100).unwrap();

    assert!(!network.has_active_links());
    assert_eq!(steps % 100, 0, "steps are counted in whole batches");
    let partition = network.fragments();
    assert_eq!(partition.sizes().iter().sum::<usize>(), 10);
}

/// Test that fragment sizes always sum to the agent count
#[test]
fn test_fragment_sizes_sum_to_n() {
    let fresh =
        Network::new(20, 4, 10, Topology::RandomRegular { degree: 6 }, 0.0, 55).unwrap();
    assert_eq!(fresh.fragments().sizes().iter().sum::<usize>(), 20);

    let mut evolved = Network::new(12, 3, 4, Topology::Complete, 0.0, 56).unwrap();
    evolved.evolve(1_000);
    assert_eq!(evolved.fragments().sizes().iter().sum::<usize>(), 12);
}

/// Test the consensus scenario: a connected cycle with a single shared
/// trait value converges to one fragment spanning all agents
#[test]
fn test_cycle_consensus_scenario() {
    let mut network = Network::new(4, 1, 1, Topology::Cycle, 0.0, 123).unwrap();

    // A single trait value forces unanimity from the start
    let steps = network.evolve_to_convergence(1_000).unwrap();
    assert_eq!(steps, 0);
    assert!(!network.has_active_links());

    let partition = network.fragments();
    assert_eq!(partition.fragment_count(), 1);
    assert_eq!(partition.sizes(), &[4]);
    assert_eq!(network.biggest_fragment().unwrap(), (0, 4));
    assert_eq!(network.mean_homophily(), 1.0);
}

/// Test that single-feature cultures have no active links: overlap is
/// either 0 or F, so every link sits on a boundary
#[test]
fn test_single_feature_links_binary() {
    let mut network = Network::new(50, 1, 50, Topology::Complete, 0.0, 321).unwrap();

    assert_eq!(network.active_link_count(), 0);
    assert_eq!(network.evolve_to_convergence(1_000).unwrap(), 0);

    // Pin both boundaries explicitly
    network.agent_at_mut(0).features[0] = 7;
    network.agent_at_mut(1).features[0] = 7;
    network.agent_at_mut(2).features[0] = 8;
    network.agent_at_mut(3).features[0] = 9;
    assert!(!network.is_active_pair(0, 1), "full overlap is not active");
    assert!(!network.is_active_pair(2, 3), "zero overlap is not active");
}

/// Test the mean homophily extremes over whole networks
#[test]
fn test_mean_homophily_extremes() {
    // One trait value per feature makes every agent identical
    let uniform = Network::new(5, 2, 1, Topology::Complete, 0.0, 7).unwrap();
    assert_eq!(uniform.mean_homophily(), 1.0);

    let mut disjoint = Network::new(3, 1, 3, Topology::Cycle, 0.0, 8).unwrap();
    for i in 0..3 {
        disjoint.agent_at_mut(i).features[0] = i as u32;
    }
    assert_eq!(disjoint.mean_homophily(), 0.0);
}

/// Test the driver pipeline: configured run, fragment record, summary file
#[test]
fn test_config_driven_run_writes_results() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("axelrod.toml");
    fs::write(
        &config_path,
        r#"
[model]
agents = 12
features = 2
traits = 3
"#,
    )
    .unwrap();

    let config = RunConfig::load(&config_path).unwrap();
    let mut network = config.model.build().unwrap();
    let steps = network
        .evolve_to_convergence(config.driver.check_interval)
        .unwrap();

    let partition = network.fragments();
    let (_, biggest) = partition.biggest().unwrap();

    // Fragment record in the delimited format
    let record = FragmentRecord::new(
        network.feature_count(),
        network.trait_count(),
        partition.sizes().to_vec(),
    );
    let record_path = dir.path().join("frag.dat");
    record.append_to(&record_path).unwrap();

    let line = fs::read_to_string(&record_path).unwrap();
    let fields: Vec<&str> = line.trim().split(", ").collect();
    assert_eq!(fields[0], "2");
    assert_eq!(fields[1], "3");
    let total: usize = fields[2..]
        .iter()
        .map(|field| field.parse::<usize>().unwrap())
        .sum();
    assert_eq!(total, 12);

    // Summary round-trips through its JSON file
    let parameters = RunParameters::new(
        network.len(),
        network.feature_count(),
        network.trait_count(),
        network.topology().name(),
        network.noise(),
        network.seed(),
    );
    let summary = RunSummary::new(parameters, steps, true)
        .with_fragments(partition.fragment_count(), biggest)
        .with_mean_homophily(network.mean_homophily())
        .with_active_links(network.active_link_count());
    let summary_path = dir.path().join("summary.json");
    summary.write_to(&summary_path).unwrap();

    let loaded = RunSummary::from_json(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(loaded.run_id, summary.run_id);
    assert_eq!(loaded.parameters.agents, 12);
    assert!(loaded.converged);
    assert_eq!(loaded.active_links, 0);
}
