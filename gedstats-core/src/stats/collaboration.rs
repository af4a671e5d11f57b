//! Pairwise collaboration graph
//!
//! For every unordered pair of actors, the edge weight is the number of
//! records both touched within the filtered set. Records are keyed by
//! (tree, xref) tuples, so identical xrefs in different trees never collide.
//! Edges below the minimum-shared-records threshold are dropped; anonymous
//! changes carry no actor identity and never contribute.

use crate::types::ChangeRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One actor in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Actor id
    pub user_id: i64,
    /// Number of distinct records this actor touched
    pub records_touched: u64,
}

/// One undirected edge; `user_a < user_b` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub user_a: i64,
    pub user_b: i64,
    /// Number of distinct records both actors touched
    pub shared_records: u64,
}

/// Collaboration graph over a filtered record set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollaborationGraph {
    /// All identified actors in the set, ascending by id
    pub nodes: Vec<Node>,
    /// Edges meeting the threshold, ascending by (user_a, user_b)
    pub edges: Vec<Edge>,
}

/// Build the collaboration graph.
///
/// `min_shared` is the minimum intersection size for an edge (default 3 in
/// the service configuration). Empty input yields an empty graph.
pub fn collaboration_graph(records: &[ChangeRecord], min_shared: u64) -> CollaborationGraph {
    let mut touched: BTreeMap<i64, BTreeSet<(&str, &str)>> = BTreeMap::new();
    for record in records {
        if let Some(user_id) = record.user_id {
            touched
                .entry(user_id)
                .or_default()
                .insert((record.tree.as_str(), record.xref.as_str()));
        }
    }

    let nodes: Vec<Node> = touched
        .iter()
        .map(|(&user_id, records)| Node {
            user_id,
            records_touched: records.len() as u64,
        })
        .collect();

    let actors: Vec<&i64> = touched.keys().collect();
    let mut edges: Vec<Edge> = Vec::new();
    for (i, &&user_a) in actors.iter().enumerate() {
        for &&user_b in &actors[i + 1..] {
            let shared = touched[&user_a].intersection(&touched[&user_b]).count() as u64;
            if shared >= min_shared {
                edges.push(Edge {
                    user_a,
                    user_b,
                    shared_records: shared,
                });
            }
        }
    }

    CollaborationGraph { nodes, edges }
}
