//! CLI binary for u-regroup: compute and persist the next grouping run.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, warn};
use u_regroup::cp::BacktrackSolver;
use u_regroup::graph::{PairGraph, ParticipantGraph};
use u_regroup::grouping::{GroupingConfig, GroupingModel};
use u_regroup::logging::{self, LogLevel, Renderer};

#[derive(Parser)]
#[command(
    name = "u-regroup",
    about = "Partition participants into rotating groups that avoid hierarchy and recent pairings"
)]
struct Cli {
    /// Participants in adjacency-list format; managers list their direct
    /// reports as neighbors so they are never grouped together
    #[arg(long, default_value = "participant-adjlist")]
    participant_adjlist: PathBuf,

    /// Participants to leave out of this run, e.g. people out of office
    /// (one per line)
    #[arg(long, default_value = "participant-excluded")]
    participant_excluded: PathBuf,

    /// Directory where solutions are written and from which historical
    /// solutions are read (one space-delimited group per line)
    #[arg(long, default_value = "solutions")]
    solution_dir: PathBuf,

    /// Desired size of each group (at least 2)
    #[arg(long, default_value_t = 2)]
    desired_group_size: usize,

    /// Number N of most recent solutions whose pairings must not repeat;
    /// unlimited when omitted, 0 disables history
    #[arg(long)]
    historical_solution_limit: Option<usize>,

    /// Maximum number of solutions to generate (0 for all); normally 1
    #[arg(long, default_value_t = 1)]
    solution_limit: usize,

    /// Seed for randomizing the search order
    #[arg(long)]
    seed: Option<u64>,

    /// Only process log records at this level or greater
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_min_level: LogLevel,

    /// Log format; auto picks console on a terminal, json otherwise
    #[arg(long, value_enum, default_value_t = Renderer::Auto)]
    log_renderer: Renderer,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_min_level, cli.log_renderer)
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")?;

    let mut participants = ParticipantGraph::read_adjlist(&cli.participant_adjlist)
        .context("failed to load participants")?;
    debug!(graph = %participants.node_link_data().to_json(), "participants");

    let excluded = PairGraph::read_adjlist(&cli.participant_excluded)
        .context("failed to load excluded participants")?;
    debug!(graph = %excluded.node_link_data().to_json(), "excluded");

    for node in participants.remove_excluded(&excluded) {
        warn!(participant = %node, "excluded participant not found");
    }
    debug!(graph = %participants.node_link_data().to_json(), "participants - excluded");

    let mut config = GroupingConfig::default().with_desired_group_size(cli.desired_group_size);
    config.historical_solution_limit = cli.historical_solution_limit;
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let model = GroupingModel::new(&participants, &cli.solution_dir, config)
        .context("failed to build grouping model")?;
    model
        .solve(&BacktrackSolver::new(), cli.solution_limit)
        .context("failed to solve")?;

    Ok(())
}
