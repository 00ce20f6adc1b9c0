//! Participant graphs and adjacency-list input.
//!
//! Two graph shapes are used:
//!
//! - [`ParticipantGraph`]: directed hierarchy; an edge `parent -> child`
//!   marks two participants that must never share a group.
//! - [`PairGraph`]: undirected co-membership, used both for exclusion
//!   lists, historical solutions and the groups of a fresh solution.
//!
//! Both read the adjacency-list text format: one node per line followed by
//! its whitespace-delimited neighbors, `#` starting a comment.

use crate::error::{GroupingError, Result};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Parses adjacency-list text into `(node, neighbors)` rows.
///
/// Text after `#` is ignored; blank lines are skipped.
///
/// # Examples
///
/// ```
/// use u_regroup::graph::parse_adjlist;
///
/// let rows = parse_adjlist("alice bob carol # managers\n\n# comment\ndave\n".as_bytes()).unwrap();
/// assert_eq!(rows[0], ("alice".to_string(), vec!["bob".to_string(), "carol".to_string()]));
/// assert_eq!(rows[1], ("dave".to_string(), vec![]));
/// ```
pub fn parse_adjlist<R: BufRead>(reader: R) -> io::Result<Vec<(String, Vec<String>)>> {
    let mut rows = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let content = line.split('#').next().unwrap_or_default();
        let mut tokens = content.split_whitespace().map(str::to_string);
        if let Some(node) = tokens.next() {
            rows.push((node, tokens.collect()));
        }
    }
    Ok(rows)
}

fn read_adjlist_file(path: &Path) -> Result<Vec<(String, Vec<String>)>> {
    let file = File::open(path).map_err(|e| GroupingError::io("read", path, e))?;
    parse_adjlist(BufReader::new(file)).map_err(|e| GroupingError::io("read", path, e))
}

/// Node-link rendering of a graph, for structured log fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLinkData {
    pub directed: bool,
    pub nodes: Vec<NodeEntry>,
    pub links: Vec<LinkEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeEntry {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntry {
    pub source: String,
    pub target: String,
}

impl NodeLinkData {
    fn new<'a>(
        directed: bool,
        nodes: impl Iterator<Item = &'a String>,
        links: impl Iterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        Self {
            directed,
            nodes: nodes.map(|id| NodeEntry { id: id.clone() }).collect(),
            links: links
                .map(|(source, target)| LinkEntry {
                    source: source.clone(),
                    target: target.clone(),
                })
                .collect(),
        }
    }

    /// Compact JSON text of the graph.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Directed participant hierarchy.
///
/// # Examples
///
/// ```
/// use u_regroup::graph::ParticipantGraph;
///
/// let mut g = ParticipantGraph::new();
/// g.add_edge("manager", "report");
/// g.add_node("peer");
/// assert_eq!(g.node_count(), 3);
/// assert!(g.has_edge("manager", "report"));
/// assert!(!g.has_edge("report", "manager"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantGraph {
    nodes: BTreeSet<String>,
    edges: BTreeSet<(String, String)>,
}

impl ParticipantGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from adjacency rows: `node -> neighbor` edges.
    pub fn from_rows(rows: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let mut graph = Self::new();
        for (node, neighbors) in rows {
            graph.add_node(node.clone());
            for neighbor in neighbors {
                graph.add_edge(node.clone(), neighbor);
            }
        }
        graph
    }

    /// Reads a directed adjacency-list file.
    pub fn read_adjlist(path: &Path) -> Result<Self> {
        read_adjlist_file(path).map(Self::from_rows)
    }

    pub fn add_node(&mut self, node: impl Into<String>) {
        self.nodes.insert(node.into());
    }

    /// Adds `parent -> child`, inserting both nodes.
    pub fn add_edge(&mut self, parent: impl Into<String>, child: impl Into<String>) {
        let (parent, child) = (parent.into(), child.into());
        self.nodes.insert(parent.clone());
        self.nodes.insert(child.clone());
        self.edges.insert((parent, child));
    }

    /// Removes a node and every edge touching it.
    ///
    /// Returns `false` if the node was not present.
    pub fn remove_node(&mut self, node: &str) -> bool {
        if !self.nodes.remove(node) {
            return false;
        }
        self.edges.retain(|(a, b)| a != node && b != node);
        true
    }

    /// Removes every node of `excluded` along with its hierarchy edges.
    ///
    /// Names not in the graph are skipped and returned in sorted order.
    pub fn remove_excluded(&mut self, excluded: &PairGraph) -> Vec<String> {
        excluded
            .nodes()
            .filter(|node| !self.remove_node(node))
            .cloned()
            .collect()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains(node)
    }

    pub fn has_edge(&self, parent: &str, child: &str) -> bool {
        self.edges
            .contains(&(parent.to_string(), child.to_string()))
    }

    /// Nodes in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &String> {
        self.nodes.iter()
    }

    /// `(parent, child)` edges in sorted order.
    pub fn edges(&self) -> impl Iterator<Item = (&String, &String)> {
        self.edges.iter().map(|(a, b)| (a, b))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_link_data(&self) -> NodeLinkData {
        NodeLinkData::new(true, self.nodes(), self.edges())
    }
}

/// Undirected graph over participant names.
///
/// Self-loops are not stored: a pair always names two distinct people.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl PairGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph from adjacency rows, ignoring edge direction.
    pub fn from_rows(rows: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let mut graph = Self::new();
        for (node, neighbors) in rows {
            graph.add_node(node.clone());
            for neighbor in neighbors {
                graph.add_edge(&node, &neighbor);
            }
        }
        graph
    }

    /// Reads an undirected adjacency-list file.
    pub fn read_adjlist(path: &Path) -> Result<Self> {
        read_adjlist_file(path).map(Self::from_rows)
    }

    pub fn add_node(&mut self, node: impl Into<String>) {
        self.adjacency.entry(node.into()).or_default();
    }

    pub fn add_edge(&mut self, a: &str, b: &str) {
        self.add_node(a);
        self.add_node(b);
        if a == b {
            return;
        }
        if let Some(set) = self.adjacency.get_mut(a) {
            set.insert(b.to_string());
        }
        if let Some(set) = self.adjacency.get_mut(b) {
            set.insert(a.to_string());
        }
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(b))
    }

    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Superimposes `other` onto `self`: node and edge union.
    pub fn compose(mut self, other: &PairGraph) -> Self {
        for (node, neighbors) in &other.adjacency {
            self.add_node(node.clone());
            for neighbor in neighbors {
                self.add_edge(node, neighbor);
            }
        }
        self
    }

    /// Nodes in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &String> {
        self.adjacency.keys()
    }

    /// Each undirected edge once, as `(smaller, larger)`.
    pub fn edges(&self) -> impl Iterator<Item = (&String, &String)> {
        self.adjacency.iter().flat_map(|(a, set)| {
            set.iter()
                .filter(move |b| a < *b)
                .map(move |b| (a, b))
        })
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    /// Connected components, each a sorted member set.
    pub fn connected_components(&self) -> Vec<BTreeSet<String>> {
        let mut seen: BTreeSet<&String> = BTreeSet::new();
        let mut components = Vec::new();
        for start in self.adjacency.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = BTreeSet::new();
            let mut stack = vec![start];
            while let Some(node) = stack.pop() {
                component.insert(node.clone());
                for neighbor in &self.adjacency[node] {
                    if seen.insert(neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
            components.push(component);
        }
        components
    }

    pub fn node_link_data(&self) -> NodeLinkData {
        NodeLinkData::new(false, self.nodes(), self.edges())
    }
}
