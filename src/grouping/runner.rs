//! Run orchestration.
//!
//! 1. Validate inputs, load recent history, build the pairing model
//! 2. Pick the next run identifier from the solution directory
//! 3. Enumerate solutions through a [`SolutionWriter`]
//! 4. Classify the terminal status and log the outcome

use super::builder::{validate_inputs, PairingModel};
use super::config::GroupingConfig;
use super::history::{HistoricalSolutionLoader, SolutionDir};
use super::writer::SolutionWriter;
use crate::cp::{CpSolver, SearchStats, SolverStatus};
use crate::error::Result;
use crate::graph::ParticipantGraph;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// How a terminal solver status is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Solutions were found.
    Solved,
    /// No grouping satisfies the constraints, or none was found in time.
    /// An expected operational outcome, logged as a warning.
    Unsolved,
    /// The engine failed in a way the run cannot interpret.
    Unexpected,
}

impl StatusClass {
    pub fn of(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Optimal | SolverStatus::Feasible => StatusClass::Solved,
            SolverStatus::Infeasible | SolverStatus::Unknown => StatusClass::Unsolved,
            SolverStatus::ModelInvalid => StatusClass::Unexpected,
        }
    }
}

/// Outcome of one [`GroupingModel::solve`] call.
#[derive(Debug, Clone)]
pub struct SolveReport {
    /// Run identifier used to name the solution files.
    pub solution_name: String,
    /// Terminal solver status.
    pub status: SolverStatus,
    /// Number of solutions written.
    pub solutions_found: usize,
    /// Files written, in enumeration order.
    pub files: Vec<PathBuf>,
    /// Engine statistics.
    pub stats: SearchStats,
}

impl SolveReport {
    pub fn class(&self) -> StatusClass {
        StatusClass::of(self.status)
    }
}

/// A validated, fully constrained grouping problem bound to its solution
/// directory.
#[derive(Debug, Clone)]
pub struct GroupingModel {
    model: PairingModel,
    dir: SolutionDir,
    config: GroupingConfig,
}

impl GroupingModel {
    /// Validates the inputs, reads history and builds the pairing model.
    ///
    /// # Errors
    ///
    /// Validation errors are raised before the solution directory is read;
    /// I/O errors while reading history are fatal.
    pub fn new(
        participants: &ParticipantGraph,
        solution_dir: impl Into<PathBuf>,
        config: GroupingConfig,
    ) -> Result<Self> {
        validate_inputs(participants.node_count(), config.desired_group_size)?;

        let dir = SolutionDir::new(solution_dir);
        let history =
            HistoricalSolutionLoader::new(&dir, config.historical_solution_limit).load()?;
        let model = PairingModel::build(participants, config.desired_group_size, &history)?;

        Ok(Self { model, dir, config })
    }

    pub fn pairing_model(&self) -> &PairingModel {
        &self.model
    }

    pub fn solution_dir(&self) -> &SolutionDir {
        &self.dir
    }

    /// Searches for up to `solution_limit` groupings (0 for all) and writes
    /// each one under the next run identifier.
    pub fn solve<S: CpSolver>(&self, solver: &S, solution_limit: usize) -> Result<SolveReport> {
        let solution_name = self.dir.next_solution_id()?.to_string();
        let mut writer =
            SolutionWriter::new(&self.model, &self.dir, solution_name.clone(), solution_limit);

        let outcome = solver.search_all(self.model.cp_model(), &self.config.solver, &mut writer)?;

        let report = SolveReport {
            solution_name,
            status: outcome.status,
            solutions_found: writer.solution_count(),
            files: writer.written().to_vec(),
            stats: outcome.stats,
        };
        log_finish(&report);
        Ok(report)
    }
}

fn log_finish(report: &SolveReport) {
    let status = report.status.name();
    let stats = &report.stats;
    match report.class() {
        StatusClass::Unexpected => error!(status, "finish"),
        StatusClass::Solved => info!(
            status,
            solutions_found = report.solutions_found,
            wall_time = stats.wall_time.as_secs_f64(),
            branches = stats.branches,
            conflicts = stats.conflicts,
            "finish"
        ),
        StatusClass::Unsolved => warn!(
            status,
            solutions_found = report.solutions_found,
            wall_time = stats.wall_time.as_secs_f64(),
            branches = stats.branches,
            conflicts = stats.conflicts,
            "finish"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{BacktrackSolver, SearchControl, SearchOutcome, SolutionCallback, SolverConfig};
    use crate::cp::{Assignment, CpModel};
    use crate::error::GroupingError;
    use std::fs;
    use tempfile::TempDir;

    fn people(names: &[&str]) -> ParticipantGraph {
        let mut g = ParticipantGraph::new();
        for name in names {
            g.add_node(*name);
        }
        g
    }

    /// Engine stand-in that reports a fixed status without searching.
    struct StatusOnly(SolverStatus);

    impl CpSolver for StatusOnly {
        fn search_all<C: SolutionCallback>(
            &self,
            _model: &CpModel,
            _config: &SolverConfig,
            _callback: &mut C,
        ) -> std::result::Result<SearchOutcome, C::Error> {
            Ok(SearchOutcome {
                status: self.0,
                stats: SearchStats::default(),
            })
        }
    }

    /// Engine stand-in that replays one assignment until told to stop.
    struct Replay(Vec<bool>, usize);

    impl CpSolver for Replay {
        fn search_all<C: SolutionCallback>(
            &self,
            _model: &CpModel,
            _config: &SolverConfig,
            callback: &mut C,
        ) -> std::result::Result<SearchOutcome, C::Error> {
            let mut stats = SearchStats::default();
            for _ in 0..self.1 {
                stats.solutions += 1;
                if callback.on_solution(&Assignment::new(&self.0))? == SearchControl::Stop {
                    return Ok(SearchOutcome {
                        status: SolverStatus::Feasible,
                        stats,
                    });
                }
            }
            Ok(SearchOutcome {
                status: SolverStatus::Optimal,
                stats,
            })
        }
    }

    #[test]
    fn test_status_classes() {
        assert_eq!(StatusClass::of(SolverStatus::Optimal), StatusClass::Solved);
        assert_eq!(StatusClass::of(SolverStatus::Feasible), StatusClass::Solved);
        assert_eq!(StatusClass::of(SolverStatus::Infeasible), StatusClass::Unsolved);
        assert_eq!(StatusClass::of(SolverStatus::Unknown), StatusClass::Unsolved);
        assert_eq!(StatusClass::of(SolverStatus::ModelInvalid), StatusClass::Unexpected);
    }

    #[test]
    fn test_validation_before_history() {
        let tmp = TempDir::new().unwrap();
        // The directory does not exist; validation must fail first.
        let result = GroupingModel::new(
            &people(&["A", "B", "C"]),
            tmp.path().join("absent"),
            GroupingConfig::default().with_desired_group_size(4),
        );
        assert!(matches!(
            result,
            Err(GroupingError::GroupSizeExceedsParticipants { .. })
        ));
    }

    #[test]
    fn test_next_identifier_skips_gaps() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("0"), "A B\nC D\n").unwrap();
        fs::write(tmp.path().join("4"), "A C\nB D\n").unwrap();

        let model = GroupingModel::new(
            &people(&["A", "B", "C", "D"]),
            tmp.path(),
            GroupingConfig::default().with_historical_solution_limit(0),
        )
        .unwrap();
        let report = model.solve(&BacktrackSolver::new(), 1).unwrap();

        assert_eq!(report.solution_name, "5");
        assert_eq!(report.files, vec![tmp.path().join("5")]);
        assert_eq!(report.class(), StatusClass::Solved);
    }

    #[test]
    fn test_unexpected_status_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let model =
            GroupingModel::new(&people(&["A", "B"]), tmp.path(), GroupingConfig::default())
                .unwrap();
        let report = model
            .solve(&StatusOnly(SolverStatus::ModelInvalid), 1)
            .unwrap();

        assert_eq!(report.class(), StatusClass::Unexpected);
        assert_eq!(report.solutions_found, 0);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_engine_substitution() {
        let tmp = TempDir::new().unwrap();
        let model = GroupingModel::new(
            &people(&["A", "B", "C", "D"]),
            tmp.path(),
            GroupingConfig::default(),
        )
        .unwrap();

        let pairing = model.pairing_model();
        let mut values = vec![false; pairing.cp_model().var_count()];
        for (i, j) in [(0, 1), (1, 0), (2, 3), (3, 2)] {
            values[pairing.pair(i, j).index()] = true;
        }

        let report = model.solve(&Replay(values, 5), 2).unwrap();
        assert_eq!(report.status, SolverStatus::Feasible);
        assert_eq!(report.solutions_found, 2);
        assert_eq!(
            fs::read_to_string(tmp.path().join("0_1")).unwrap(),
            "A B\nC D\n"
        );
    }
}
