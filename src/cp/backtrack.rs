//! Propagating backtracking search.
//!
//! # Algorithm
//!
//! 1. Apply fixed variables and revise every constraint once
//! 2. Pick an unassigned variable, try one value, propagate
//! 3. On a dead end, undo the trail to the last decision and try the
//!    other value; exhaust both values before backing up further
//! 4. On a complete assignment, hand it to the callback
//!
//! Propagation is bounds reasoning on 0/1 sums: a constraint is revised
//! whenever one of its variables is assigned, and it either detects a
//! conflict or forces the remaining free variables.

use super::model::{Constraint, CpModel};
use super::solver::{
    Assignment, CpSolver, SearchControl, SearchOutcome, SearchStats, SolutionCallback,
    SolverConfig, SolverStatus,
};
use super::variables::Domain;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Exhaustive DFS solver with constraint propagation.
///
/// Enumerates every satisfying assignment exactly once. Suitable for the
/// small-to-medium boolean models produced by consumer layers; it performs
/// no learning or restarts.
///
/// # Examples
///
/// ```
/// use u_regroup::cp::{BacktrackSolver, CpModel, CpSolver, SolutionCollector, SolverConfig, SolverStatus};
///
/// let mut model = CpModel::new("one-of-three");
/// let vars: Vec<_> = (0..3).map(|i| model.new_bool_var(format!("x{i}"))).collect();
/// model.add_sum_equals(vars, 1);
///
/// let mut collector = SolutionCollector::new();
/// let outcome = BacktrackSolver::new()
///     .search_all(&model, &SolverConfig::default(), &mut collector)
///     .unwrap();
/// assert_eq!(outcome.status, SolverStatus::Optimal);
/// assert_eq!(collector.solutions.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BacktrackSolver {
    cancel: Option<Arc<AtomicBool>>,
}

impl BacktrackSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches an external cancellation flag, checked before every decision.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl CpSolver for BacktrackSolver {
    fn search_all<C: SolutionCallback>(
        &self,
        model: &CpModel,
        config: &SolverConfig,
        callback: &mut C,
    ) -> Result<SearchOutcome, C::Error> {
        let start_time = Instant::now();

        if model.validate().is_err() {
            return Ok(SearchOutcome {
                status: SolverStatus::ModelInvalid,
                stats: SearchStats::default(),
            });
        }

        let mut rng = config.seed.map(StdRng::seed_from_u64);
        let mut search = Search::new(model);
        if let Some(rng) = rng.as_mut() {
            search.order.shuffle(rng);
        }

        let mut stats = SearchStats::default();
        let mut decisions: Vec<Decision> = Vec::new();
        let mut interrupted = false;
        let mut exhausted = !search.initialize();
        if exhausted {
            stats.conflicts += 1;
        }

        while !exhausted {
            if self.is_cancelled() || config.branch_limit.is_some_and(|l| stats.branches >= l) {
                interrupted = true;
                break;
            }

            match search.next_unassigned() {
                None => {
                    let values = search.complete_values();
                    if model.is_satisfied_by(&values) {
                        stats.solutions += 1;
                        let control = callback.on_solution(&Assignment::new(&values))?;
                        if control == SearchControl::Stop {
                            interrupted = true;
                            break;
                        }
                    } else {
                        stats.conflicts += 1;
                    }
                    exhausted = !search.backtrack(&mut decisions, &mut stats);
                }
                Some(var) => {
                    let first = match rng.as_mut() {
                        Some(rng) => rng.random_bool(0.5),
                        None => true,
                    };
                    stats.branches += 1;
                    decisions.push(Decision {
                        var,
                        trail_len: search.trail.len(),
                        alternative: Some(!first),
                    });
                    if !search.decide(var, first) {
                        stats.conflicts += 1;
                        exhausted = !search.backtrack(&mut decisions, &mut stats);
                    }
                }
            }
        }

        let status = match (interrupted, stats.solutions > 0) {
            (false, true) => SolverStatus::Optimal,
            (false, false) => SolverStatus::Infeasible,
            (true, true) => SolverStatus::Feasible,
            (true, false) => SolverStatus::Unknown,
        };
        stats.wall_time = start_time.elapsed();

        Ok(SearchOutcome { status, stats })
    }
}

/// A branching point on the decision stack.
#[derive(Debug, Clone, Copy)]
struct Decision {
    var: usize,
    trail_len: usize,
    /// Value still to try, if any.
    alternative: Option<bool>,
}

/// Mutable search state over one model.
struct Search<'m> {
    model: &'m CpModel,
    /// var -> constraints that read it
    watches: Vec<Vec<usize>>,
    values: Vec<Option<bool>>,
    trail: Vec<usize>,
    order: Vec<usize>,
    queue: VecDeque<usize>,
    queued: Vec<bool>,
}

impl<'m> Search<'m> {
    fn new(model: &'m CpModel) -> Self {
        let n = model.var_count();
        let mut watches = vec![Vec::new(); n];
        for (index, constraint) in model.constraints.iter().enumerate() {
            for var in constraint.vars() {
                let watch: &mut Vec<usize> = &mut watches[var.index()];
                if watch.last() != Some(&index) {
                    watch.push(index);
                }
            }
        }

        Self {
            model,
            watches,
            values: vec![None; n],
            trail: Vec::with_capacity(n),
            order: (0..n).collect(),
            queue: VecDeque::new(),
            queued: vec![false; model.constraint_count()],
        }
    }

    /// Applies fixed variables and revises every constraint once.
    fn initialize(&mut self) -> bool {
        let model = self.model;
        for (index, var) in model.bool_vars.iter().enumerate() {
            if let Some(value) = var.fixed {
                if !self.assign(index, value) {
                    return false;
                }
            }
        }
        for index in 0..model.constraint_count() {
            self.enqueue(index);
        }
        self.propagate()
    }

    fn next_unassigned(&self) -> Option<usize> {
        self.order
            .iter()
            .copied()
            .find(|&var| self.values[var].is_none())
    }

    fn complete_values(&self) -> Vec<bool> {
        self.values.iter().map(|v| v.unwrap_or(false)).collect()
    }

    fn decide(&mut self, var: usize, value: bool) -> bool {
        self.assign(var, value) && self.propagate()
    }

    /// Pops decisions until one has an untried value that propagates.
    ///
    /// Returns `false` once the decision stack is empty.
    fn backtrack(&mut self, decisions: &mut Vec<Decision>, stats: &mut SearchStats) -> bool {
        while let Some(decision) = decisions.pop() {
            self.undo(decision.trail_len);
            if let Some(value) = decision.alternative {
                stats.branches += 1;
                decisions.push(Decision {
                    alternative: None,
                    ..decision
                });
                if self.decide(decision.var, value) {
                    return true;
                }
                stats.conflicts += 1;
            }
        }
        false
    }

    fn undo(&mut self, trail_len: usize) {
        for var in self.trail.drain(trail_len..) {
            self.values[var] = None;
        }
    }

    fn enqueue(&mut self, constraint: usize) {
        if !self.queued[constraint] {
            self.queued[constraint] = true;
            self.queue.push_back(constraint);
        }
    }

    fn assign(&mut self, var: usize, value: bool) -> bool {
        match self.values[var] {
            Some(current) => current == value,
            None => {
                self.values[var] = Some(value);
                self.trail.push(var);
                for i in 0..self.watches[var].len() {
                    let constraint = self.watches[var][i];
                    self.enqueue(constraint);
                }
                true
            }
        }
    }

    fn propagate(&mut self) -> bool {
        while let Some(constraint) = self.queue.pop_front() {
            self.queued[constraint] = false;
            if !self.revise(constraint) {
                for index in self.queue.drain(..) {
                    self.queued[index] = false;
                }
                return false;
            }
        }
        true
    }

    fn revise(&mut self, constraint: usize) -> bool {
        let model = self.model;
        match &model.constraints[constraint] {
            Constraint::Fix { var, value } => self.assign(var.index(), *value),
            Constraint::Equal { a, b } => match (self.values[a.index()], self.values[b.index()]) {
                (Some(x), None) => self.assign(b.index(), x),
                (None, Some(y)) => self.assign(a.index(), y),
                (Some(x), Some(y)) => x == y,
                (None, None) => true,
            },
            Constraint::SumNotEqual { vars, value } => {
                let (trues, free, last_free) = self.count(vars.iter().map(|v| v.index()));
                match free {
                    0 => trues != *value,
                    // The single free variable must avoid completing the forbidden count.
                    1 => match value - trues {
                        0 => self.assign(last_free, true),
                        1 => self.assign(last_free, false),
                        _ => true,
                    },
                    _ => true,
                }
            }
            Constraint::SumInDomain { vars, domain } => {
                self.revise_sum(vars.iter().map(|v| v.index()), domain)
            }
            Constraint::SumEquals { vars, value } => {
                self.revise_sum(vars.iter().map(|v| v.index()), &Domain::singleton(*value))
            }
        }
    }

    /// Bounds reasoning for `sum(vars) in domain`.
    fn revise_sum<I>(&mut self, vars: I, domain: &Domain) -> bool
    where
        I: Iterator<Item = usize> + Clone,
    {
        let (lo, free, _) = self.count(vars.clone());
        let hi = lo + free;
        let mut feasible = domain.within(lo, hi);
        let Some(min) = feasible.next() else {
            return false;
        };
        let max = feasible.last().unwrap_or(min);

        if free == 0 {
            return true;
        }
        let forced = if max == lo {
            false
        } else if min == hi {
            true
        } else {
            return true;
        };
        for var in vars {
            if self.values[var].is_none() && !self.assign(var, forced) {
                return false;
            }
        }
        true
    }

    /// Returns (true count, free count, last free variable).
    fn count(&self, vars: impl Iterator<Item = usize>) -> (i64, i64, usize) {
        let mut trues = 0;
        let mut free = 0;
        let mut last_free = 0;
        for var in vars {
            match self.values[var] {
                Some(true) => trues += 1,
                Some(false) => {}
                None => {
                    free += 1;
                    last_free = var;
                }
            }
        }
        (trues, free, last_free)
    }
}
