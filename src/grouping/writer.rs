//! Solution extraction and persistence.

use super::builder::PairingModel;
use super::history::SolutionDir;
use crate::cp::{Assignment, SearchControl, SolutionCallback};
use crate::error::{GroupingError, Result};
use crate::graph::PairGraph;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

/// A canonical partition: members sorted within groups, groups sorted.
///
/// # Examples
///
/// ```
/// use u_regroup::grouping::Partition;
///
/// let p = Partition::new(vec![
///     vec!["D".into(), "C".into()],
///     vec!["B".into(), "A".into()],
/// ]);
/// assert_eq!(p.to_string(), "A B\nC D\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    groups: Vec<Vec<String>>,
}

impl Partition {
    /// Canonicalizes arbitrary groups.
    pub fn new(mut groups: Vec<Vec<String>>) -> Self {
        for group in &mut groups {
            group.sort();
        }
        groups.sort();
        Self { groups }
    }

    /// Reads the groups of an assignment of `model`.
    ///
    /// Groups are the connected components of the true pairs; every
    /// participant appears in exactly one group.
    pub fn from_assignment(model: &PairingModel, assignment: &Assignment<'_>) -> Self {
        let participants = model.participants();
        let mut graph = PairGraph::new();
        for (i, a) in participants.iter().enumerate() {
            graph.add_node(a.clone());
            for (j, b) in participants.iter().enumerate().skip(i + 1) {
                if assignment.value(model.pair(i, j)) {
                    graph.add_edge(a, b);
                }
            }
        }
        Self::new(
            graph
                .connected_components()
                .into_iter()
                .map(|component| component.into_iter().collect())
                .collect(),
        )
    }

    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }

    /// Whether `a` and `b` share a group.
    pub fn together(&self, a: &str, b: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.iter().any(|m| m == a) && g.iter().any(|m| m == b))
    }
}

/// One space-delimited line per group, the solution file format.
impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for group in &self.groups {
            writeln!(f, "{}", group.join(" "))?;
        }
        Ok(())
    }
}

/// Solver callback that persists every solution of a run.
///
/// With a solution limit of one the file is named by the run identifier;
/// otherwise each solution gets `{id}_{index}`, index counting from zero.
/// A limit of zero lets the search run to exhaustion.
#[derive(Debug)]
pub struct SolutionWriter<'a> {
    model: &'a PairingModel,
    dir: &'a SolutionDir,
    solution_name: String,
    solution_limit: usize,
    solution_count: usize,
    written: Vec<PathBuf>,
}

impl<'a> SolutionWriter<'a> {
    pub fn new(
        model: &'a PairingModel,
        dir: &'a SolutionDir,
        solution_name: impl Into<String>,
        solution_limit: usize,
    ) -> Self {
        Self {
            model,
            dir,
            solution_name: solution_name.into(),
            solution_limit,
            solution_count: 0,
            written: Vec::new(),
        }
    }

    /// Solutions persisted so far.
    pub fn solution_count(&self) -> usize {
        self.solution_count
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn file_name(&self) -> String {
        if self.solution_limit == 1 {
            self.solution_name.clone()
        } else {
            format!("{}_{}", self.solution_name, self.solution_count)
        }
    }

    fn persist(&self, partition: &Partition) -> Result<PathBuf> {
        let path = self.dir.file(&self.file_name());
        let file = File::create(&path).map_err(|e| GroupingError::io("write", &path, e))?;
        let mut out = BufWriter::new(file);
        write!(out, "{partition}")
            .and_then(|()| out.flush())
            .map_err(|e| GroupingError::io("write", &path, e))?;
        Ok(path)
    }
}

impl SolutionCallback for SolutionWriter<'_> {
    type Error = GroupingError;

    fn on_solution(&mut self, assignment: &Assignment<'_>) -> Result<SearchControl> {
        let partition = Partition::from_assignment(self.model, assignment);
        let path = self.persist(&partition)?;
        debug!(
            path = %path.display(),
            groups = partition.groups().len(),
            "solution written"
        );
        self.written.push(path);

        self.solution_count += 1;
        if self.solution_limit > 0 && self.solution_count >= self.solution_limit {
            return Ok(SearchControl::Stop);
        }
        Ok(SearchControl::Continue)
    }
}
