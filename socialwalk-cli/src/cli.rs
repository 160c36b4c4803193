//! Command-line interface orchestration for socialwalk.
//!
//! The `simulate` command builds a network, wires it from the requested
//! degree profile, and estimates the focus category's share with both
//! walkers, optionally as a parallel ensemble of independent walks.

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::{RngCore, SeedableRng, rngs::SmallRng};
use socialwalk_core::{
    Category, CategoryCounts, ConnectionProfile, DeadEndPolicy, DegreeDistribution, Estimate,
    MetropolisHastings, NetworkBuilder, NetworkError, WalkConfig, metropolis_hastings_ensemble,
    random_walk_ensemble,
};
use thiserror::Error;
use tracing::instrument;

const DEFAULT_NODES: usize = 1_000;
const DEFAULT_MALE_RATIO: f64 = 0.4;
const DEFAULT_STEPS: usize = 10_000;
const DEFAULT_SEED: u64 = 42;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "socialwalk",
    about = "Estimate category shares of a synthetic social network by random walks."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a network and walk it.
    Simulate(SimulateCommand),
}

/// Options accepted by the `simulate` command.
#[derive(Debug, Args, Clone)]
pub struct SimulateCommand {
    /// Number of nodes in the network.
    #[arg(long, default_value_t = DEFAULT_NODES)]
    pub nodes: usize,

    /// Fraction of nodes that are male, strictly between 0 and 1.
    #[arg(long = "male-ratio", default_value_t = DEFAULT_MALE_RATIO)]
    pub male_ratio: f64,

    /// Steps per walk.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,

    /// Seed for generation and sampling.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Start every walk at this node instead of a random one.
    #[arg(long = "start-node")]
    pub start_node: Option<usize>,

    /// Behaviour when a walk sits on a node without neighbours.
    #[arg(long = "dead-end", value_enum, default_value_t = DeadEndArg::Terminate)]
    pub dead_end: DeadEndArg,

    /// Category whose share is estimated; defaults to the minority.
    #[arg(long, value_enum)]
    pub focus: Option<CategoryArg>,

    /// Male to male degree target as `MEAN,STD`.
    #[arg(long = "male-male", value_parser = parse_distribution, default_value = "23,5")]
    pub male_male: DegreeDistribution,

    /// Male to female degree target as `MEAN,STD`.
    #[arg(long = "male-female", value_parser = parse_distribution, default_value = "5,3")]
    pub male_female: DegreeDistribution,

    /// Female to male degree target as `MEAN,STD`.
    #[arg(long = "female-male", value_parser = parse_distribution, default_value = "5,3")]
    pub female_male: DegreeDistribution,

    /// Female to female degree target as `MEAN,STD`.
    #[arg(long = "female-female", value_parser = parse_distribution, default_value = "12,3")]
    pub female_female: DegreeDistribution,

    /// Number of independent walks per sampler.
    #[arg(long, default_value_t = 1)]
    pub walks: usize,
}

impl SimulateCommand {
    fn profile(&self) -> ConnectionProfile {
        ConnectionProfile {
            male_to_male: self.male_male,
            male_to_female: self.male_female,
            female_to_male: self.female_male,
            female_to_female: self.female_female,
        }
    }

    fn walk_config(&self) -> WalkConfig {
        let mut config = WalkConfig::new(self.steps).with_dead_end(self.dead_end.into());
        if let Some(node) = self.start_node {
            config = config.with_start_node(node);
        }
        if let Some(focus) = self.focus {
            config = config.with_focus(focus.into());
        }
        config
    }
}

/// Dead-end policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeadEndArg {
    /// Stop and report the steps taken so far.
    Terminate,
    /// Jump to a random node that has neighbours.
    Restart,
}

impl From<DeadEndArg> for DeadEndPolicy {
    fn from(value: DeadEndArg) -> Self {
        match value {
            DeadEndArg::Terminate => Self::Terminate,
            DeadEndArg::Restart => Self::Restart,
        }
    }
}

/// Categories selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Male nodes.
    Male,
    /// Female nodes.
    Female,
}

impl From<CategoryArg> for Category {
    fn from(value: CategoryArg) -> Self {
        match value {
            CategoryArg::Male => Self::Male,
            CategoryArg::Female => Self::Female,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A `MEAN,STD` pair could not be parsed.
    #[error("expected `MEAN,STD`, got `{provided}`")]
    MalformedDistribution {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// Core generation or sampling failed.
    #[error(transparent)]
    Core(#[from] NetworkError),
}

fn parse_distribution(raw: &str) -> Result<DegreeDistribution, CliError> {
    let malformed = || CliError::MalformedDistribution {
        provided: raw.to_owned(),
    };
    let (mean, std_dev) = raw.split_once(',').ok_or_else(malformed)?;
    let mean: f64 = mean.trim().parse().map_err(|_| malformed())?;
    let std_dev: f64 = std_dev.trim().parse().map_err(|_| malformed())?;
    Ok(DegreeDistribution::new(mean, std_dev)?)
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    /// Category tallies of the population.
    pub census: CategoryCounts,
    /// Undirected edges in the generated graph.
    pub edge_count: usize,
    /// Nodes left without neighbours.
    pub isolated: usize,
    /// Category the estimates refer to.
    pub focus: Category,
    /// Walks run per sampler.
    pub walks: usize,
    /// Steps requested per walk.
    pub steps: usize,
    /// Raw simple random walk share. A single walk has no spread.
    pub observed: Estimate,
    /// Inverse-degree weighted simple random walk share.
    pub unbiased: Estimate,
    /// Metropolis-Hastings share.
    pub metropolis_hastings: Estimate,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when generation or sampling fails.
///
/// # Examples
/// ```
/// # use socialwalk_cli::cli::{Cli, Command, DeadEndArg, SimulateCommand, run_cli};
/// # use socialwalk_core::{Category, DegreeDistribution};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let degree = DegreeDistribution::new(4.0, 1.0)?;
/// let cli = Cli {
///     command: Command::Simulate(SimulateCommand {
///         nodes: 40,
///         male_ratio: 0.25,
///         steps: 200,
///         seed: 7,
///         start_node: None,
///         dead_end: DeadEndArg::Restart,
///         focus: None,
///         male_male: degree,
///         male_female: degree,
///         female_male: degree,
///         female_female: degree,
///         walks: 1,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.census.get(Category::Male), 10);
/// assert_eq!(summary.focus, Category::Male);
/// # Ok(())
/// # }
/// ```
pub fn run_cli(cli: Cli) -> Result<SimulationSummary, CliError> {
    match cli.command {
        Command::Simulate(command) => simulate(&command),
    }
}

#[instrument(
    name = "cli.simulate",
    err,
    skip(command),
    fields(nodes = command.nodes, steps = command.steps, walks = command.walks, seed = command.seed),
)]
fn simulate(command: &SimulateCommand) -> Result<SimulationSummary, CliError> {
    let mut network = NetworkBuilder::new()
        .with_node_count(command.nodes)
        .with_male_ratio(command.male_ratio)
        .build()?;
    let mut rng = SmallRng::seed_from_u64(command.seed);
    network.generate(&command.profile(), &mut rng)?;
    let graph = network.graph().ok_or(NetworkError::NetworkNotGenerated)?;
    let nodes = network.nodes();
    let config = command.walk_config();

    let (focus, observed, unbiased, metropolis_hastings) = if command.walks == 1 {
        let simple = network.random_walk(&config, &mut rng)?;
        let mh = network.metropolis_hastings_walk(&config, &mut rng)?;
        (
            simple.focus(),
            Estimate::exact(simple.observed_probability()),
            Estimate::exact(simple.unbiased_probability()),
            Estimate::exact(mh.probability()),
        )
    } else {
        let walk_seed = rng.next_u64();
        let simple = random_walk_ensemble(graph, nodes, &config, command.walks, walk_seed)?;
        let mh = metropolis_hastings_ensemble(
            graph,
            nodes,
            &config,
            &MetropolisHastings,
            command.walks,
            walk_seed,
        )?;
        let focus = simple
            .reports()
            .first()
            .map_or_else(|| network.minority(), |report| report.focus());
        (
            focus,
            simple.observed(),
            simple.unbiased(),
            mh.probability(),
        )
    };

    Ok(SimulationSummary {
        census: network.census(),
        edge_count: graph.edge_count(),
        isolated: graph.node_count() - graph.connected_nodes().len(),
        focus,
        walks: command.walks,
        steps: command.steps,
        observed,
        unbiased,
        metropolis_hastings,
    })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &SimulationSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "census: {}", summary.census)?;
    writeln!(
        writer,
        "edges: {} ({} isolated nodes)",
        summary.edge_count, summary.isolated
    )?;
    writeln!(
        writer,
        "walks: {} x {} steps, focus: {}",
        summary.walks, summary.steps, summary.focus
    )?;
    write_estimate(&mut writer, "random walk (observed)", summary.observed)?;
    write_estimate(&mut writer, "random walk (unbiased)", summary.unbiased)?;
    write_estimate(&mut writer, "metropolis-hastings", summary.metropolis_hastings)?;
    Ok(())
}

fn write_estimate(
    writer: &mut impl Write,
    label: &str,
    estimate: Estimate,
) -> io::Result<()> {
    if estimate.std_dev > 0.0 {
        writeln!(
            writer,
            "{label}: {:.4} ± {:.4}",
            estimate.mean, estimate.std_dev
        )
    } else {
        writeln!(writer, "{label}: {:.4}", estimate.mean)
    }
}
