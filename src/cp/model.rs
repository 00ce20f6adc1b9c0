//! CP model definition.

use super::variables::{BoolVar, Domain, VarId};
use thiserror::Error;

/// A constraint over boolean variables.
///
/// Linear constraints treat each variable as 0/1 with unit coefficient.
/// Domain-specific encodings (pairings, partitions) are built from these
/// at the consumer layer.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// The variable takes the given value.
    Fix { var: VarId, value: bool },

    /// Two variables take the same value.
    Equal { a: VarId, b: VarId },

    /// The number of true variables is anything but `value`.
    SumNotEqual {
        /// Summed variables.
        vars: Vec<VarId>,
        /// Forbidden count.
        value: i64,
    },

    /// The number of true variables lies in `domain`.
    SumInDomain {
        /// Summed variables.
        vars: Vec<VarId>,
        /// Admissible counts.
        domain: Domain,
    },

    /// The number of true variables is exactly `value`.
    SumEquals {
        /// Summed variables.
        vars: Vec<VarId>,
        /// Required count.
        value: i64,
    },
}

impl Constraint {
    /// Variables the constraint reads.
    pub fn vars(&self) -> Vec<VarId> {
        match self {
            Constraint::Fix { var, .. } => vec![*var],
            Constraint::Equal { a, b } => vec![*a, *b],
            Constraint::SumNotEqual { vars, .. }
            | Constraint::SumInDomain { vars, .. }
            | Constraint::SumEquals { vars, .. } => vars.clone(),
        }
    }

    /// Checks the constraint against a complete assignment.
    pub fn is_satisfied(&self, values: &[bool]) -> bool {
        let count = |vars: &[VarId]| vars.iter().filter(|v| values[v.index()]).count() as i64;
        match self {
            Constraint::Fix { var, value } => values[var.index()] == *value,
            Constraint::Equal { a, b } => values[a.index()] == values[b.index()],
            Constraint::SumNotEqual { vars, value } => count(vars) != *value,
            Constraint::SumInDomain { vars, domain } => domain.contains(count(vars)),
            Constraint::SumEquals { vars, value } => count(vars) == *value,
        }
    }
}

/// Structural problems detected by [`CpModel::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A constraint references a variable the model does not own.
    #[error("constraint {constraint} references undefined variable {var}")]
    UndefinedVariable { constraint: usize, var: VarId },

    /// A domain constraint admits no value.
    #[error("constraint {constraint} has an empty domain")]
    EmptyDomain { constraint: usize },
}

/// A constraint programming model over boolean variables.
///
/// # Examples
///
/// ```
/// use u_regroup::cp::{CpModel, Domain};
///
/// let mut model = CpModel::new("example");
/// let a = model.new_bool_var("a");
/// let b = model.new_bool_var("b");
/// model.add_equal(a, b);
/// model.add_sum_in_domain(vec![a, b], Domain::from_values([0, 2]));
/// assert!(model.validate().is_ok());
/// assert_eq!(model.var_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CpModel {
    /// Model name.
    pub name: String,
    /// Boolean variables, indexed by [`VarId`].
    pub bool_vars: Vec<BoolVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
}

impl CpModel {
    /// Creates a new empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bool_vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Adds a boolean variable and returns its handle.
    pub fn add_bool_var(&mut self, var: BoolVar) -> VarId {
        self.bool_vars.push(var);
        VarId(self.bool_vars.len() - 1)
    }

    /// Convenience: add an unfixed boolean variable.
    pub fn new_bool_var(&mut self, name: impl Into<String>) -> VarId {
        self.add_bool_var(BoolVar::new(name))
    }

    /// Looks up a variable by handle.
    pub fn bool_var(&self, id: VarId) -> Option<&BoolVar> {
        self.bool_vars.get(id.index())
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: force a variable to a value.
    pub fn add_fix(&mut self, var: VarId, value: bool) {
        self.constraints.push(Constraint::Fix { var, value });
    }

    /// Convenience: force two variables to agree.
    pub fn add_equal(&mut self, a: VarId, b: VarId) {
        self.constraints.push(Constraint::Equal { a, b });
    }

    /// Convenience: forbid one count of true variables.
    pub fn add_sum_not_equal(&mut self, vars: Vec<VarId>, value: i64) {
        self.constraints.push(Constraint::SumNotEqual { vars, value });
    }

    /// Convenience: restrict the count of true variables to a domain.
    pub fn add_sum_in_domain(&mut self, vars: Vec<VarId>, domain: Domain) {
        self.constraints.push(Constraint::SumInDomain { vars, domain });
    }

    /// Convenience: require an exact count of true variables.
    pub fn add_sum_equals(&mut self, vars: Vec<VarId>, value: i64) {
        self.constraints.push(Constraint::SumEquals { vars, value });
    }

    /// Validates the model for consistency.
    ///
    /// Checks that all referenced variables exist and that no domain is empty.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (index, constraint) in self.constraints.iter().enumerate() {
            if let Some(var) = constraint
                .vars()
                .into_iter()
                .find(|v| v.index() >= self.bool_vars.len())
            {
                return Err(ModelError::UndefinedVariable {
                    constraint: index,
                    var,
                });
            }
            if let Constraint::SumInDomain { domain, .. } = constraint {
                if domain.is_empty() {
                    return Err(ModelError::EmptyDomain { constraint: index });
                }
            }
        }
        Ok(())
    }

    /// Checks a complete assignment against every constraint and fixed variable.
    pub fn is_satisfied_by(&self, values: &[bool]) -> bool {
        values.len() == self.bool_vars.len()
            && self
                .bool_vars
                .iter()
                .zip(values)
                .all(|(var, &value)| var.fixed.map_or(true, |f| f == value))
            && self.constraints.iter().all(|c| c.is_satisfied(values))
    }

    /// Returns the number of boolean variables.
    pub fn var_count(&self) -> usize {
        self.bool_vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}
