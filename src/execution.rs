//! Linearizes the partial graph order into a total per-node execution order.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::ParsedGraph;

/// Dense execution ranking over the reachable node set.
///
/// A node is reachable when the graph order references it or a render pass
/// lists it as a member. Everything else has no order (`order_of` returns
/// None, the wire-level -1).
#[derive(Debug, Clone, Default)]
pub struct ExecutionPath {
    sequence: Vec<u32>,
    positions: BTreeMap<u32, u32>,
}

impl ExecutionPath {
    /// Node indices in execution order.
    pub fn sequence(&self) -> &[u32] {
        &self.sequence
    }

    pub fn order_of(&self, node: u32) -> Option<u32> {
        self.positions.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Walks the graph order left to right. Standalone entries append their node;
/// a render-pass entry consumes the whole consecutive run sharing that pass
/// index, then appends any member the explicit order omitted (passes are
/// authoritative over their membership). Reachable nodes never touched by the
/// scan are appended last in ascending index order. Dangling references are
/// skipped.
pub fn compile_execution_path(graph: &ParsedGraph) -> ExecutionPath {
    let mut sequence: Vec<u32> = Vec::with_capacity(graph.nodes.len());
    let mut seen: BTreeSet<u32> = BTreeSet::new();

    let mut push = |node: u32, sequence: &mut Vec<u32>, seen: &mut BTreeSet<u32>| {
        if graph.nodes.contains_key(&node) && seen.insert(node) {
            sequence.push(node);
        }
    };

    let entries = &graph.graph_order;
    let mut i = 0;
    while i < entries.len() {
        match entries[i].pass {
            None => {
                push(entries[i].node, &mut sequence, &mut seen);
                i += 1;
            }
            Some(pass_index) => {
                let mut j = i;
                while j < entries.len() && entries[j].pass == Some(pass_index) {
                    push(entries[j].node, &mut sequence, &mut seen);
                    j += 1;
                }
                if let Some(pass) = graph.render_pass(pass_index) {
                    for &member in &pass.node_indices {
                        push(member, &mut sequence, &mut seen);
                    }
                }
                i = j;
            }
        }
    }

    // Pass membership alone makes a node reachable even when the explicit
    // order never mentions its pass.
    let members: BTreeSet<u32> = graph
        .render_passes
        .iter()
        .flat_map(|p| p.node_indices.iter().copied())
        .collect();
    for member in members {
        push(member, &mut sequence, &mut seen);
    }

    let positions = sequence
        .iter()
        .enumerate()
        .map(|(pos, &node)| (node, pos as u32))
        .collect();

    ExecutionPath {
        sequence,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse;
    use crate::raw::load_graph_from_str;
    use serde_json::json;

    fn path_for(value: serde_json::Value) -> ExecutionPath {
        let raw = load_graph_from_str(&value.to_string()).unwrap();
        compile_execution_path(&parse(&raw))
    }

    #[test]
    fn pass_runs_are_consumed_before_later_entries() {
        let path = path_for(json!({
            "renderTargetDescriptions": [{}],
            "renderPassDescriptions": [
                { "nodeIndices": [0, 1, 2] },
            ],
            "nodeDataDescriptions": [
                { "nodeIndex": 0 }, { "nodeIndex": 1 },
                { "nodeIndex": 2 }, { "nodeIndex": 3 },
            ],
            // Pass 0 under-specifies its membership; node 2 still runs with
            // the pass, before the standalone node 3.
            "graphOrder": [[0, 0], [0, 1], [-1, 3]],
        }));
        assert_eq!(path.sequence(), &[0, 1, 2, 3]);
    }

    #[test]
    fn duplicates_and_dangling_references_are_skipped() {
        let path = path_for(json!({
            "renderTargetDescriptions": [{}],
            "nodeDataDescriptions": [{ "nodeIndex": 0 }, { "nodeIndex": 1 }],
            "graphOrder": [[-1, 0], [-1, 0], [-1, 9], [7, 1]],
        }));
        assert_eq!(path.sequence(), &[0, 1]);
        assert_eq!(path.order_of(0), Some(0));
        assert_eq!(path.order_of(1), Some(1));
        assert_eq!(path.order_of(9), None);
    }

    #[test]
    fn unlisted_nodes_without_pass_membership_stay_unreached() {
        let path = path_for(json!({
            "renderTargetDescriptions": [{}],
            "renderPassDescriptions": [{ "nodeIndices": [5] }],
            "nodeDataDescriptions": [
                { "nodeIndex": 2 }, { "nodeIndex": 5 }, { "nodeIndex": 8 },
            ],
            "graphOrder": [[-1, 8]],
        }));
        // 5 is reachable through pass membership, 2 through nothing.
        assert_eq!(path.sequence(), &[8, 5]);
        assert_eq!(path.order_of(2), None);
    }
}
