//! Constraint Programming (CP) framework.
//!
//! Provides a domain-agnostic model for expressing constraint satisfaction
//! problems over boolean decision variables with 0/1 linear constraints.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`], addressed by [`VarId`]; [`Domain`] for sums
//! - **Constraints**: [`Constraint`] — Fix, Equal, SumNotEqual, SumInDomain, SumEquals
//! - **Model**: [`CpModel`] — container for variables and constraints
//! - **Solver**: [`CpSolver`] trait — enumerates solutions through a
//!   [`SolutionCallback`] that may stop the search
//! - **Engine**: [`BacktrackSolver`] — propagating depth-first search
//!
//! # Design
//!
//! The [`CpSolver`] trait is the only seam consumers depend on. External
//! engines (OR-Tools CP-SAT, a SAT solver) can be plugged in behind it;
//! [`BacktrackSolver`] is the built-in implementation.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod backtrack;
mod model;
mod solver;
mod variables;

pub use backtrack::BacktrackSolver;
pub use model::{Constraint, CpModel, ModelError};
pub use solver::{
    Assignment, CpSolver, SearchControl, SearchOutcome, SearchStats, SolutionCallback,
    SolutionCollector, SolverConfig, SolverStatus,
};
pub use variables::{BoolVar, Domain, VarId};
