use super::{edge::GraphConnection, node::GraphNode};
use serde::Serialize;
use std::collections::HashSet;

/// Positioned nodes and connectors for one commit list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLayout {
    /// One node per input commit, in input order
    pub nodes: Vec<GraphNode>,
    /// One connection per resolved parent reference
    pub connections: Vec<GraphConnection>,
    /// Number of columns the renderer must reserve
    pub rail_count: usize,
}

impl GraphLayout {
    /// Count of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the node for a commit hash
    pub fn node(&self, hash: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.hash() == hash)
    }

    /// Connections leaving the node at `row`
    pub fn connections_from(&self, row: usize) -> impl Iterator<Item = &GraphConnection> {
        self.connections.iter().filter(move |c| c.from_row == row)
    }

    /// Parent hashes referenced by some node but not present in the layout,
    /// in first-seen order.
    pub fn dangling_parents(&self) -> Vec<&str> {
        let present: HashSet<&str> = self.nodes.iter().map(GraphNode::hash).collect();
        let mut seen = HashSet::new();

        self.nodes
            .iter()
            .flat_map(|node| node.commit.parents.iter())
            .map(String::as_str)
            .filter(|parent| !present.contains(parent) && seen.insert(*parent))
            .collect()
    }

    /// Get statistics about the layout
    pub fn stats(&self) -> LayoutStats {
        LayoutStats {
            total_commits: self.nodes.len(),
            total_connections: self.connections.len(),
            merge_commits: self.nodes.iter().filter(|n| n.commit.is_merge()).count(),
            root_commits: self.nodes.iter().filter(|n| n.commit.is_root()).count(),
            dangling_parents: self.dangling_parents().len(),
            rail_count: self.rail_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub total_commits: usize,
    pub total_connections: usize,
    pub merge_commits: usize,
    pub root_commits: usize,
    pub dangling_parents: usize,
    pub rail_count: usize,
}
