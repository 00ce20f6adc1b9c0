//! Grouping configuration.

use crate::cp::SolverConfig;

/// Configuration for building a grouping model.
///
/// # Defaults
///
/// ```
/// use u_regroup::grouping::GroupingConfig;
///
/// let config = GroupingConfig::default();
/// assert_eq!(config.desired_group_size, 2);
/// assert_eq!(config.historical_solution_limit, None);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_regroup::grouping::GroupingConfig;
///
/// let config = GroupingConfig::default()
///     .with_desired_group_size(4)
///     .with_historical_solution_limit(3)
///     .with_seed(11);
/// assert_eq!(config.solver.seed, Some(11));
/// ```
#[derive(Debug, Clone)]
pub struct GroupingConfig {
    /// Target number of members per group (at least 2).
    ///
    /// When the participant count is not a multiple, one group absorbs or
    /// holds the remainder.
    pub desired_group_size: usize,

    /// How many of the most recent past solutions to avoid repeating.
    ///
    /// `None` considers every past solution; `Some(0)` disables history.
    pub historical_solution_limit: Option<usize>,

    /// Settings forwarded to the solving engine.
    pub solver: SolverConfig,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            desired_group_size: 2,
            historical_solution_limit: None,
            solver: SolverConfig::default(),
        }
    }
}

impl GroupingConfig {
    /// Sets the desired group size.
    pub fn with_desired_group_size(mut self, size: usize) -> Self {
        self.desired_group_size = size;
        self
    }

    /// Sets the historical solution limit (0 to disable history).
    pub fn with_historical_solution_limit(mut self, limit: usize) -> Self {
        self.historical_solution_limit = Some(limit);
        self
    }

    /// Sets the engine's branching seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.solver.seed = Some(seed);
        self
    }

    /// Replaces the engine settings.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }
}
