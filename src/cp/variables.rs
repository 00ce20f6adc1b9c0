//! CP variable types.

use std::fmt;

/// Handle to a boolean variable inside a [`CpModel`](super::CpModel).
///
/// Handles are dense indices assigned in creation order, so they can be
/// used directly to index an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in the model.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A boolean variable (true/false decision).
#[derive(Debug, Clone)]
pub struct BoolVar {
    /// Variable name.
    pub name: String,
    /// Fixed value, if any.
    pub fixed: Option<bool>,
}

impl BoolVar {
    /// Creates a new boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// Creates a fixed boolean variable.
    pub fn fixed(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }
}

/// A finite set of admissible integer values.
///
/// Values are kept sorted and deduplicated.
///
/// # Examples
///
/// ```
/// use u_regroup::cp::Domain;
///
/// let d = Domain::from_values([2, 1, 2, 3]);
/// assert_eq!(d.values(), &[1, 2, 3]);
/// assert!(d.contains(2));
/// assert!(!d.contains(4));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    values: Vec<i64>,
}

impl Domain {
    /// Creates a domain from arbitrary values.
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Self {
        let mut values: Vec<i64> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();
        Self { values }
    }

    /// Creates a single-value domain.
    pub fn singleton(value: i64) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Sorted admissible values.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Whether `value` is admissible.
    pub fn contains(&self, value: i64) -> bool {
        self.values.binary_search(&value).is_ok()
    }

    /// Whether the domain admits no value at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Admissible values within `[lo, hi]`.
    pub fn within(&self, lo: i64, hi: i64) -> impl Iterator<Item = i64> + '_ {
        self.values
            .iter()
            .copied()
            .skip_while(move |&v| v < lo)
            .take_while(move |&v| v <= hi)
    }
}
