//! Error types for model construction and solution persistence.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building or solving a grouping model.
///
/// Solver outcomes (infeasible, unknown) are not errors; they are reported
/// through [`SolveReport`](crate::grouping::SolveReport) and logs.
#[derive(Debug, Error)]
pub enum GroupingError {
    /// Fewer than two participants remain after exclusions.
    #[error("participant graph must have at least two nodes, got {0}")]
    TooFewParticipants(usize),

    /// Desired group size below two.
    #[error("desired group size must be at least 2, got {0}")]
    GroupSizeTooSmall(usize),

    /// Desired group size larger than the participant count.
    #[error("desired group size {desired} exceeds participant count {participants}")]
    GroupSizeExceedsParticipants {
        /// Requested group size.
        desired: usize,
        /// Participants available.
        participants: usize,
    },

    /// The largest run identifier in the solution directory is `u64::MAX`.
    #[error("no run identifier left after {} in {}", u64::MAX, .path.display())]
    SolutionIdsExhausted {
        /// Solution directory.
        path: PathBuf,
    },

    /// Reading an input or writing a solution failed.
    #[error("failed to {action} {}", .path.display())]
    Io {
        /// What was being attempted ("read", "write", "list").
        action: &'static str,
        /// File or directory involved.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GroupingError {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GroupingError>;
