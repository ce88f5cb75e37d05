use crate::core::{Commit, GraphConnection, GraphLayout, GraphNode};
use crate::layout::RailAllocator;
use std::collections::HashMap;
use tracing::debug;

/// Lay out commits given in children-before-parents order.
///
/// Every commit becomes a node at `row` = its index in `commits`. Parents that
/// are not in `commits` produce no connection. The list is not re-sorted.
///
/// Hashes are expected to be unique within `commits`; deduplication is the
/// caller's job (see [`crate::session::Session`]).
pub fn compute_layout(commits: &[Commit]) -> GraphLayout {
    let mut rails = RailAllocator::new();
    let mut nodes = Vec::with_capacity(commits.len());

    for (row, commit) in commits.iter().enumerate() {
        let rail = rails.place(&commit.hash);
        nodes.push(GraphNode {
            commit: commit.clone(),
            rail,
            row,
        });
        rails.advance(rail, &commit.parents);
    }

    // fast lookup: hash -> (rail, row)
    let positions: HashMap<&str, (usize, usize)> = nodes
        .iter()
        .map(|node| (node.hash(), (node.rail, node.row)))
        .collect();

    let mut connections = Vec::new();
    for node in &nodes {
        for parent in &node.commit.parents {
            let Some(&to) = positions.get(parent.as_str()) else {
                continue;
            };
            connections.push(GraphConnection::new(
                node.commit.hash.clone(),
                parent.clone(),
                (node.rail, node.row),
                to,
            ));
        }
    }

    let rail_count = rails.rail_count();
    debug!(
        commits = nodes.len(),
        connections = connections.len(),
        rail_count,
        "computed graph layout"
    );

    GraphLayout {
        nodes,
        connections,
        rail_count,
    }
}
