//! Group-size distribution.

use crate::cp::Domain;
use std::collections::BTreeMap;

/// Multiset of group sizes every valid partition must contain.
///
/// Maps group size to the number of groups of that size. The remainder of
/// `participants / desired` is absorbed so that no group is smaller than two:
/// a remainder of one enlarges one group, a larger remainder forms its own
/// group.
///
/// # Examples
///
/// ```
/// use u_regroup::grouping::GroupSizeDistribution;
///
/// let d = GroupSizeDistribution::compute(7, 3);
/// assert_eq!(d.count(3), 1);
/// assert_eq!(d.count(4), 1);
/// assert_eq!(d.participant_total(), 7);
///
/// let d = GroupSizeDistribution::compute(8, 3);
/// assert_eq!(d.count(3), 2);
/// assert_eq!(d.count(2), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSizeDistribution {
    counts: BTreeMap<usize, usize>,
}

impl GroupSizeDistribution {
    /// Computes the distribution for `participants` people and a desired size.
    ///
    /// Callers validate `2 <= desired <= participants` beforehand.
    pub fn compute(participants: usize, desired: usize) -> Self {
        let (quotient, remainder) = (participants / desired, participants % desired);

        let mut counts = BTreeMap::new();
        match remainder {
            0 => {
                counts.insert(desired, quotient);
            }
            1 => {
                counts.insert(desired, quotient - 1);
                counts.insert(desired + 1, 1);
            }
            _ => {
                counts.insert(desired, quotient);
                counts.insert(remainder, 1);
            }
        }
        counts.retain(|_, count| *count > 0);

        Self { counts }
    }

    /// Number of groups of exactly `size` members.
    pub fn count(&self, size: usize) -> usize {
        self.counts.get(&size).copied().unwrap_or(0)
    }

    /// `(size, count)` pairs in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.counts.iter().map(|(&size, &count)| (size, count))
    }

    /// Total number of groups.
    pub fn group_count(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of people covered: Σ size × count.
    pub fn participant_total(&self) -> usize {
        self.iter().map(|(size, count)| size * count).sum()
    }

    /// Admissible co-member counts for one participant: `size - 1`.
    pub fn row_sum_domain(&self) -> Domain {
        Domain::from_values(self.counts.keys().map(|&size| size as i64 - 1))
    }

    /// True entries of the full pairing matrix: Σ size × count × (size − 1).
    pub fn pairing_total(&self) -> usize {
        self.iter()
            .map(|(size, count)| size * count * (size - 1))
            .sum()
    }
}
