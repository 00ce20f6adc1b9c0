//! Constraint-based rotating group partitioner.
//!
//! Partitions a set of named participants into disjoint groups of a target
//! size, subject to hard exclusions, and persists each run so later runs
//! avoid repeating past pairings. Typical uses are rotating lunch or
//! mentoring groups.
//!
//! - **CP (Constraint Programming)**: Domain-agnostic boolean modeling layer
//!   with a solver trait and a built-in propagating backtracking engine.
//! - **Graph**: Participant hierarchy and pair graphs, adjacency-list input.
//! - **Grouping**: The pairing model, history, solution persistence and the
//!   run orchestration.
//! - **Logging**: Process-wide `tracing` subscriber setup for the binary.
//!
//! # Architecture
//!
//! The grouping layer depends on the CP layer only through the
//! [`cp::CpSolver`] trait, so any engine able to enumerate solutions of a
//! boolean model can replace [`cp::BacktrackSolver`].
//!
//! # Example
//!
//! ```no_run
//! use u_regroup::cp::BacktrackSolver;
//! use u_regroup::graph::ParticipantGraph;
//! use u_regroup::grouping::{GroupingConfig, GroupingModel};
//! use std::path::Path;
//!
//! let participants = ParticipantGraph::read_adjlist(Path::new("participant-adjlist"))?;
//! let config = GroupingConfig::default().with_desired_group_size(3);
//! let model = GroupingModel::new(&participants, "solutions", config)?;
//! let report = model.solve(&BacktrackSolver::new(), 1)?;
//! println!("{} solution(s) written as run {}", report.solutions_found, report.solution_name);
//! # Ok::<(), u_regroup::GroupingError>(())
//! ```

pub mod cp;
pub mod error;
pub mod graph;
pub mod grouping;
pub mod logging;

pub use error::{GroupingError, Result};
