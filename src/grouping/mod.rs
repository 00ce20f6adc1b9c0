//! Rotating group partitioning.
//!
//! Splits participants into disjoint groups of a target size such that no
//! manager shares a group with a direct report and no pair repeats from
//! recent runs. Each run's partition is persisted in a solution directory
//! and read back by later runs.
//!
//! # Key Components
//!
//! - [`GroupSizeDistribution`] — group sizes every valid partition contains
//! - [`HistoricalSolutionLoader`] — recent past partitions as one exclusion graph
//! - [`PairingModel`] — the constrained pairwise boolean matrix
//! - [`SolutionWriter`] — solver callback that canonicalizes and persists
//! - [`GroupingModel`] — validation, next run identifier, solve and status logging

mod builder;
mod config;
mod history;
mod runner;
mod sizes;
mod writer;

pub use builder::PairingModel;
pub use config::GroupingConfig;
pub use history::{parse_solution, HistoricalSolutionLoader, SolutionDir, COMMENT_MARKER};
pub use runner::{GroupingModel, SolveReport, StatusClass};
pub use sizes::GroupSizeDistribution;
pub use writer::{Partition, SolutionWriter};
