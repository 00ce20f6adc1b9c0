//! Solution directory and historical exclusions.
//!
//! A solution directory holds one file per run, named by the run number.
//! Past runs are read back to forbid repeating recent pairings.

use crate::error::{GroupingError, Result};
use crate::graph::PairGraph;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Marker for comment lines in solution files.
pub const COMMENT_MARKER: char = '#';

/// Directory of persisted solutions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionDir {
    path: PathBuf,
}

impl SolutionDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the file named `name` inside the directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Identifiers of the regular files whose name is all decimal digits.
    ///
    /// Other entries are ignored. The order is unspecified.
    pub fn solution_ids(&self) -> Result<Vec<u64>> {
        let entries =
            fs::read_dir(&self.path).map_err(|e| GroupingError::io("list", &self.path, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GroupingError::io("list", &self.path, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !is_solution_name(name) {
                continue;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match name.parse::<u64>() {
                Ok(id) => ids.push(id),
                Err(_) => warn!(path = %path.display(), "solution identifier out of range"),
            }
        }
        Ok(ids)
    }

    /// Identifier for the next run: one past the largest existing one.
    ///
    /// Fails rather than wrap when that largest identifier is `u64::MAX`.
    pub fn next_solution_id(&self) -> Result<u64> {
        match self.solution_ids()?.into_iter().max() {
            None => Ok(0),
            Some(id) => id
                .checked_add(1)
                .ok_or_else(|| GroupingError::SolutionIdsExhausted {
                    path: self.path.clone(),
                }),
        }
    }
}

fn is_solution_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}

/// Parses one solution: every line is a group, members pairwise linked.
///
/// Lines starting with [`COMMENT_MARKER`] are skipped.
///
/// # Examples
///
/// ```
/// use u_regroup::grouping::parse_solution;
///
/// let g = parse_solution("# run 4\nA B C\nD E\n".as_bytes()).unwrap();
/// assert!(g.has_edge("A", "C"));
/// assert!(g.has_edge("E", "D"));
/// assert!(!g.has_edge("C", "D"));
/// ```
pub fn parse_solution<R: BufRead>(reader: R) -> std::io::Result<PairGraph> {
    let mut graph = PairGraph::new();
    for line in reader.lines() {
        let line = line?;
        if line.starts_with(COMMENT_MARKER) {
            continue;
        }
        let group: Vec<&str> = line.split_whitespace().collect();
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                graph.add_edge(a, b);
            }
        }
    }
    Ok(graph)
}

/// Loads the most recent past solutions into one exclusion graph.
#[derive(Debug, Clone)]
pub struct HistoricalSolutionLoader<'a> {
    dir: &'a SolutionDir,
    limit: Option<usize>,
}

impl<'a> HistoricalSolutionLoader<'a> {
    /// `limit`: how many recent runs to read; `None` reads all, `Some(0)` none.
    pub fn new(dir: &'a SolutionDir, limit: Option<usize>) -> Self {
        Self { dir, limit }
    }

    /// Identifiers to read, most recent first.
    pub fn selected_ids(&self) -> Result<Vec<u64>> {
        if self.limit == Some(0) {
            return Ok(Vec::new());
        }
        let mut ids = self.dir.solution_ids()?;
        ids.sort_unstable_by(|a, b| b.cmp(a));
        if let Some(limit) = self.limit {
            ids.truncate(limit);
        }
        Ok(ids)
    }

    /// Reads one past solution.
    pub fn read(&self, id: u64) -> Result<PairGraph> {
        let path = self.dir.file(&id.to_string());
        let file = File::open(&path).map_err(|e| GroupingError::io("read", &path, e))?;
        parse_solution(BufReader::new(file)).map_err(|e| GroupingError::io("read", &path, e))
    }

    /// Union of every selected past solution; empty when there are none.
    pub fn load(&self) -> Result<PairGraph> {
        let ids = self.selected_ids()?;
        let composed = ids
            .iter()
            .map(|&id| self.read(id))
            .try_fold(PairGraph::new(), |acc, graph| graph.map(|g| acc.compose(&g)))?;
        debug!(
            solutions = ?ids,
            pairs = composed.edge_count(),
            "historical solutions loaded"
        );
        Ok(composed)
    }
}
