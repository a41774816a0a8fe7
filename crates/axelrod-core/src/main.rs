//! Axelrod Cultural Dissemination Simulator
//!
//! Builds a network of agents from a TOML configuration (with command-line
//! overrides), runs the copying dynamics until the culture stops changing
//! or a step budget runs out, and writes the fragment census to disk.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use axelrod_core::{ConvergenceOutcome, RunConfig, Topology, DEFAULT_CONFIG_PATH};
use axelrod_report::{FragmentRecord, RunParameters, RunSummary};

/// Command line arguments for the simulator
#[derive(Parser, Debug)]
#[command(name = "axelrod_sim")]
#[command(about = "Axelrod model of cultural dissemination")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of agents
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Number of cultural features per agent
    #[arg(short = 'f', long)]
    features: Option<usize>,

    /// Number of traits each feature can take
    #[arg(short = 'q', long)]
    traits: Option<u32>,

    /// Per-step mutation probability in [0, 1]
    #[arg(long)]
    noise: Option<f64>,

    /// Step budget; the run stops here even without convergence
    #[arg(long)]
    max_steps: Option<u64>,

    /// Directory the result files are written into
    #[arg(long)]
    output_dir: Option<String>,

    /// Enable debug-level log output
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides the --verbose default
    let level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Load configuration, then let flags override file values
    let mut config = RunConfig::load_or_default(&args.config);
    if let Some(seed) = args.seed {
        config.model.seed = seed;
    }
    if let Some(agents) = args.agents {
        config.model.agents = agents;
    }
    if let Some(features) = args.features {
        config.model.features = features;
    }
    if let Some(traits) = args.traits {
        config.model.traits = traits;
    }
    if let Some(noise) = args.noise {
        config.model.noise = noise;
    }
    if let Some(max_steps) = args.max_steps {
        config.driver.max_steps = Some(max_steps);
    }
    if let Some(output_dir) = args.output_dir {
        config.driver.output_dir = output_dir;
    }

    println!("Axelrod Cultural Dissemination");
    println!("==============================");
    println!("Agents: {}", config.model.agents);
    println!("Features: {}", config.model.features);
    println!("Traits: {}", config.model.traits);
    println!("Topology: {}", config.model.topology);
    println!("Noise: {}", config.model.noise);
    println!("Seed: {}", config.model.seed);
    println!();

    if config.model.noise > 0.0 && config.driver.max_steps.is_none() {
        eprintln!("Error: runs with noise never converge; set max_steps to bound the run");
        std::process::exit(1);
    }

    // Ensure the output directory exists
    fs::create_dir_all(&config.driver.output_dir).unwrap_or_else(|e| {
        eprintln!("Warning: Could not create output directory: {}", e);
    });

    println!("Building network...");
    let mut network = config.model.build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!(
        "  Created {} agents with {} edges",
        network.len(),
        network.edges().count()
    );

    println!();
    println!("Running...");
    info!("Run starting with seed {}", config.model.seed);
    let interval = config.driver.check_interval;
    let (steps, converged) = match config.driver.max_steps {
        Some(budget) => match network.evolve_to_convergence_bounded(interval, budget) {
            ConvergenceOutcome::Converged(steps) => (steps, true),
            ConvergenceOutcome::BudgetExhausted(steps) => (steps, false),
        },
        None => match network.evolve_to_convergence(interval) {
            Ok(steps) => (steps, true),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    };
    info!("Run finished after {} steps", steps);

    println!();
    if converged {
        println!("Converged after {} steps.", steps);
    } else {
        println!("Step budget exhausted after {} steps.", steps);
    }

    // Final-state census
    let partition = network.fragments();
    let (label, size) = partition.biggest().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let mean = network.mean_homophily();
    let active = network.active_link_count();

    println!("Fragments: {}", partition.fragment_count());
    println!("Biggest fragment: {} agents (label {})", size, label);
    println!("Mean homophily: {:.4}", mean);
    println!("Active links: {}", active);

    println!();
    println!("Writing results...");
    let output_dir = Path::new(&config.driver.output_dir);

    let record = FragmentRecord::new(
        network.feature_count(),
        network.trait_count(),
        partition.sizes().to_vec(),
    );
    let record_path = output_dir.join("frag.dat");
    if let Err(e) = record.append_to(&record_path) {
        eprintln!("  Warning: Could not write {}: {}", record_path.display(), e);
    } else {
        println!("  Wrote {}", record_path.display());
    }

    let parameters = RunParameters::new(
        network.len(),
        network.feature_count(),
        network.trait_count(),
        network.topology().name(),
        network.noise(),
        network.seed(),
    );
    let summary = RunSummary::new(parameters, steps, converged)
        .with_fragments(partition.fragment_count(), size)
        .with_mean_homophily(mean)
        .with_active_links(active);
    let summary_path = output_dir.join("summary.json");
    if let Err(e) = summary.write_to(&summary_path) {
        eprintln!("  Warning: Could not write {}: {}", summary_path.display(), e);
    } else {
        println!("  Wrote {}", summary_path.display());
    }

    // Matrix exports only make sense on a square lattice
    if network.topology() == Topology::Lattice2d {
        write_lattice_grids(&network, output_dir);
    }

    println!();
    println!("Run {} complete.", summary.run_id);
}

/// Writes the first-feature and vaccination matrices for lattice runs.
fn write_lattice_grids(network: &axelrod_core::Network, output_dir: &Path) {
    let exports = [
        ("first_feature.txt", network.first_feature_grid()),
        ("vaccinated.txt", network.vaccinated_grid()),
    ];
    for (name, grid) in exports {
        let path = output_dir.join(name);
        match grid {
            Ok(grid) => {
                if let Err(e) = grid.write_to(&path) {
                    eprintln!("  Warning: Could not write {}: {}", path.display(), e);
                } else {
                    println!("  Wrote {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("  Warning: Could not export {}: {}", name, e);
            }
        }
    }
}
