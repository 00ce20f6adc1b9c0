//! CP solver interface.
//!
//! A solver enumerates complete assignments that satisfy a [`CpModel`],
//! handing each one to a [`SolutionCallback`]. The callback decides whether
//! the search continues, which is the only way a consumer steers the search.

use super::model::CpModel;
use super::variables::VarId;
use std::fmt;
use std::time::Duration;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverStatus {
    /// The search space was exhausted and at least one solution was found.
    Optimal,
    /// At least one solution was found, but the search stopped early.
    Feasible,
    /// The search space was exhausted without finding a solution.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// The search stopped early without finding a solution.
    Unknown,
}

impl SolverStatus {
    /// Upper-case status name, as reported in logs.
    pub fn name(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::ModelInvalid => "MODEL_INVALID",
            SolverStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether at least one solution was found.
    pub fn is_solution_found(self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::Feasible)
    }
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Search statistics collected during one solver call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Wall-clock duration of the search.
    pub wall_time: Duration,
    /// Number of branching decisions (values tried on decision variables).
    pub branches: u64,
    /// Number of dead ends reached during propagation.
    pub conflicts: u64,
    /// Number of solutions handed to the callback.
    pub solutions: u64,
}

/// Terminal result of [`CpSolver::search_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Solver status.
    pub status: SolverStatus,
    /// Search statistics.
    pub stats: SearchStats,
}

/// Answer of a [`SolutionCallback`]: keep searching or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchControl {
    /// Look for the next solution.
    Continue,
    /// Stop the search after this solution.
    Stop,
}

/// A complete satisfying assignment, borrowed for the duration of a callback.
#[derive(Debug, Clone, Copy)]
pub struct Assignment<'a> {
    values: &'a [bool],
}

impl<'a> Assignment<'a> {
    /// Wraps a complete value vector indexed by [`VarId`].
    pub fn new(values: &'a [bool]) -> Self {
        Self { values }
    }

    /// Value of a variable.
    ///
    /// # Panics
    ///
    /// Panics if `var` does not belong to the solved model.
    pub fn value(&self, var: VarId) -> bool {
        self.values[var.index()]
    }

    /// All values, indexed by [`VarId::index`].
    pub fn values(&self) -> &'a [bool] {
        self.values
    }
}

/// Receives each solution found by a [`CpSolver`].
///
/// Called synchronously and never concurrently; returning an error aborts
/// the search and the error is returned from [`CpSolver::search_all`].
pub trait SolutionCallback {
    /// Error raised by the callback.
    type Error;

    /// Handles one solution.
    fn on_solution(&mut self, assignment: &Assignment<'_>) -> Result<SearchControl, Self::Error>;
}

/// Callback that keeps every solution in memory, up to an optional limit.
#[derive(Debug, Clone, Default)]
pub struct SolutionCollector {
    /// Collected assignments.
    pub solutions: Vec<Vec<bool>>,
    /// Stop after this many solutions (`None` for all).
    pub limit: Option<usize>,
}

impl SolutionCollector {
    /// Collects every solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects at most `limit` solutions.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            solutions: Vec::new(),
            limit: Some(limit),
        }
    }
}

impl SolutionCallback for SolutionCollector {
    type Error = std::convert::Infallible;

    fn on_solution(&mut self, assignment: &Assignment<'_>) -> Result<SearchControl, Self::Error> {
        self.solutions.push(assignment.values().to_vec());
        match self.limit {
            Some(limit) if self.solutions.len() >= limit => Ok(SearchControl::Stop),
            _ => Ok(SearchControl::Continue),
        }
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_regroup::cp::SolverConfig;
///
/// let config = SolverConfig::default().with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// assert!(config.branch_limit.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Seed for randomizing the branching order.
    ///
    /// `None` branches on variables in creation order, trying `true` first.
    pub seed: Option<u64>,

    /// Maximum number of branching decisions before giving up.
    ///
    /// `None` searches until the space is exhausted or the callback stops.
    pub branch_limit: Option<u64>,
}

impl SolverConfig {
    /// Sets the branching seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the branch limit.
    pub fn with_branch_limit(mut self, limit: u64) -> Self {
        self.branch_limit = Some(limit);
        self
    }
}

/// Trait for CP solver implementations.
///
/// Implementors provide the actual search. This can wrap an external
/// engine or provide a custom one such as
/// [`BacktrackSolver`](super::BacktrackSolver).
pub trait CpSolver {
    /// Enumerates satisfying assignments of `model`, invoking `callback`
    /// once per assignment until the space is exhausted or the callback
    /// returns [`SearchControl::Stop`].
    fn search_all<C: SolutionCallback>(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        callback: &mut C,
    ) -> Result<SearchOutcome, C::Error>;
}
