//! Pairing model construction.
//!
//! The partition is encoded as an N × N boolean matrix where `var[i][j]`
//! means "participants i and j share a group". Constraints make the matrix
//! an equivalence relation without its diagonal, bound every group size to
//! the target distribution, and forbid hierarchy and historical pairs.

use super::sizes::GroupSizeDistribution;
use crate::cp::{CpModel, VarId};
use crate::error::{GroupingError, Result};
use crate::graph::{PairGraph, ParticipantGraph};
use tracing::debug;

/// The constrained pairing matrix for one run.
///
/// Immutable once built; handed to a [`CpSolver`](crate::cp::CpSolver).
#[derive(Debug, Clone)]
pub struct PairingModel {
    participants: Vec<String>,
    pairs: Vec<Vec<VarId>>,
    distribution: GroupSizeDistribution,
    model: CpModel,
}

impl PairingModel {
    /// Builds the model for the participants of `graph`.
    ///
    /// # Errors
    ///
    /// Rejects fewer than two participants and a desired size outside
    /// `[2, participants]` before any constraint is created.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_regroup::graph::{PairGraph, ParticipantGraph};
    /// use u_regroup::grouping::PairingModel;
    ///
    /// let mut graph = ParticipantGraph::new();
    /// for name in ["A", "B", "C", "D"] {
    ///     graph.add_node(name);
    /// }
    /// let model = PairingModel::build(&graph, 2, &PairGraph::new()).unwrap();
    /// assert_eq!(model.participants().len(), 4);
    /// assert_eq!(model.cp_model().var_count(), 16);
    /// ```
    pub fn build(
        graph: &ParticipantGraph,
        desired_group_size: usize,
        history: &PairGraph,
    ) -> Result<Self> {
        let participants: Vec<String> = graph.nodes().cloned().collect();
        let n = participants.len();
        validate_inputs(n, desired_group_size)?;

        let mut model = CpModel::new("pairing");
        let pairs: Vec<Vec<VarId>> = participants
            .iter()
            .map(|a| {
                participants
                    .iter()
                    .map(|b| model.new_bool_var(format!("{a} {b}")))
                    .collect()
            })
            .collect();

        let mut this = Self {
            participants,
            pairs,
            distribution: GroupSizeDistribution::compute(n, desired_group_size),
            model,
        };
        this.apply_no_self_pair();
        this.apply_symmetry();
        this.apply_transitivity();
        this.apply_group_sizes();
        this.apply_hierarchy(graph);
        this.apply_history(history);

        debug!(
            participants = n,
            variables = this.model.var_count(),
            constraints = this.model.constraint_count(),
            distribution = ?this.distribution,
            "pairing model built"
        );
        Ok(this)
    }

    /// Participants in sorted order; row/column order of the matrix.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Variable for "participants i and j share a group".
    pub fn pair(&self, i: usize, j: usize) -> VarId {
        self.pairs[i][j]
    }

    /// Matrix index of a participant.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.participants
            .binary_search_by(|p| p.as_str().cmp(name))
            .ok()
    }

    pub fn distribution(&self) -> &GroupSizeDistribution {
        &self.distribution
    }

    pub fn cp_model(&self) -> &CpModel {
        &self.model
    }

    fn len(&self) -> usize {
        self.participants.len()
    }

    fn apply_no_self_pair(&mut self) {
        for i in 0..self.len() {
            self.model.add_fix(self.pairs[i][i], false);
        }
    }

    fn apply_symmetry(&mut self) {
        let n = self.len();
        for i in 0..n {
            for j in i + 1..n {
                self.model.add_equal(self.pairs[i][j], self.pairs[j][i]);
            }
        }
    }

    /// No triangle has exactly two co-membership edges, so every connected
    /// set of true pairs is a clique.
    fn apply_transitivity(&mut self) {
        let n = self.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let triangle = vec![self.pairs[i][j], self.pairs[i][k], self.pairs[j][k]];
                    self.model.add_sum_not_equal(triangle, 2);
                }
            }
        }
    }

    /// Every row sums to `size - 1` for some target size, and the whole
    /// matrix sums to the total only the target distribution reaches.
    fn apply_group_sizes(&mut self) {
        let domain = self.distribution.row_sum_domain();
        for row in &self.pairs {
            self.model.add_sum_in_domain(row.clone(), domain.clone());
        }

        let all: Vec<VarId> = self.pairs.iter().flatten().copied().collect();
        self.model
            .add_sum_equals(all, self.distribution.pairing_total() as i64);
    }

    /// Both directions are fixed; symmetry alone would also cover the reverse.
    fn apply_hierarchy(&mut self, graph: &ParticipantGraph) {
        for (parent, child) in graph.edges() {
            if let (Some(i), Some(j)) = (self.index_of(parent), self.index_of(child)) {
                self.model.add_fix(self.pairs[i][j], false);
                self.model.add_fix(self.pairs[j][i], false);
            }
        }
    }

    fn apply_history(&mut self, history: &PairGraph) {
        for (a, b) in history.edges() {
            if let (Some(i), Some(j)) = (self.index_of(a), self.index_of(b)) {
                self.model.add_fix(self.pairs[i][j], false);
            }
        }
    }
}

/// Checks `participants >= 2` and `2 <= desired_group_size <= participants`.
pub(crate) fn validate_inputs(participants: usize, desired_group_size: usize) -> Result<()> {
    if participants < 2 {
        return Err(GroupingError::TooFewParticipants(participants));
    }
    if desired_group_size < 2 {
        return Err(GroupingError::GroupSizeTooSmall(desired_group_size));
    }
    if participants < desired_group_size {
        return Err(GroupingError::GroupSizeExceedsParticipants {
            desired: desired_group_size,
            participants,
        });
    }
    Ok(())
}
