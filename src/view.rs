//! Flat, UI-consumable projection of an analyzed graph.
//!
//! Field names and array orderings are the contract the rendering layer keys
//! off, positionally and by name. Keep them stable.

use serde::Serialize;

use crate::analysis::{GraphUsage, Relationship, TargetUsage};
use crate::codes::external_resource_name;
use crate::execution::ExecutionPath;
use crate::model::{Node, ParsedGraph, RenderTarget};

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub summary: Summary,
    pub nodes_by_execution_order: Vec<NodeView>,
    pub render_targets_by_first_usage: Vec<RenderTargetView>,
    pub render_passes: Vec<RenderPassView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_render_targets: usize,
    pub total_nodes: usize,
    pub total_render_passes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeView {
    pub index: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub execution_order: i64,
    pub render_pass: Option<String>,
    pub render_pass_index: Option<u32>,
    pub inputs: Vec<TargetRef>,
    pub outputs: Vec<TargetRef>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetRef {
    pub index: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderTargetView {
    pub index: u32,
    pub name: String,
    pub format: u32,
    pub extent: [u64; 3],
    pub mip_levels: u32,
    pub sample_count: u32,
    pub usage: u32,
    pub writers: Vec<UsageEntry>,
    pub readers: Vec<UsageEntry>,
    pub conditions: Vec<String>,
    pub lifetime: LifetimeSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct UsageEntry {
    pub node_index: u32,
    pub node_name: String,
    pub execution_order: i64,
    /// Kind of the strongest relationship record: attachment kinds win over
    /// generic input/output, which win over shader bindings.
    pub relationship: &'static str,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LifetimeSummary {
    pub first_used_at_node: Option<u32>,
    pub last_used_at_node: Option<u32>,
    pub first_execution_order: Option<u32>,
    pub last_execution_order: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderPassView {
    pub index: u32,
    pub name: String,
    pub node_indices: Vec<u32>,
    pub color_attachment_indices: Vec<u32>,
    pub depth_attachment_index: Option<u32>,
    pub resolve_attachment_indices: Vec<u32>,
    pub conditions: Vec<String>,
}

/// Pure projection; running it twice over the same analysis yields identical
/// output.
pub fn project_view(
    graph: &ParsedGraph,
    path: &ExecutionPath,
    usage: &GraphUsage,
) -> ViewModel {
    ViewModel {
        summary: Summary {
            total_render_targets: graph.render_targets.len(),
            total_nodes: graph.nodes.len(),
            total_render_passes: graph.render_passes.len(),
        },
        nodes_by_execution_order: nodes_by_execution_order(graph, path),
        render_targets_by_first_usage: render_targets_by_first_usage(graph, path, usage),
        render_passes: graph
            .render_passes
            .iter()
            .map(|p| RenderPassView {
                index: p.index,
                name: p.name.clone(),
                node_indices: p.node_indices.clone(),
                color_attachment_indices: p.color_attachment_indices.clone(),
                depth_attachment_index: p.depth_attachment_index,
                resolve_attachment_indices: p.resolve_attachment_indices.clone(),
                conditions: p.conditions.clone(),
            })
            .collect(),
    }
}

fn nodes_by_execution_order(graph: &ParsedGraph, path: &ExecutionPath) -> Vec<NodeView> {
    let mut views: Vec<NodeView> = path
        .sequence()
        .iter()
        .filter_map(|&index| graph.node(index))
        .map(|node| node_view(graph, path, node))
        .collect();
    // Unreached nodes follow in their original (ascending index) order.
    views.extend(
        graph
            .nodes
            .values()
            .filter(|n| path.order_of(n.index).is_none())
            .map(|node| node_view(graph, path, node)),
    );
    views
}

fn node_view(graph: &ParsedGraph, path: &ExecutionPath, node: &Node) -> NodeView {
    let pass = node
        .render_pass_index
        .and_then(|i| graph.render_pass(i));
    NodeView {
        index: node.index,
        name: node.name.clone(),
        kind: node.kind.label(),
        execution_order: order_or_minus_one(path, node.index),
        render_pass: pass.map(|p| p.name.clone()),
        render_pass_index: node.render_pass_index,
        inputs: node.inputs.iter().map(|&t| target_ref(graph, t)).collect(),
        outputs: node.outputs.iter().map(|&t| target_ref(graph, t)).collect(),
        conditions: node.conditions.clone(),
    }
}

fn target_ref(graph: &ParsedGraph, index: u32) -> TargetRef {
    let name = match graph.render_target(index) {
        Some(rt) => rt.name.clone(),
        None => external_resource_name(index)
            .unwrap_or("<missing>")
            .to_string(),
    };
    TargetRef { index, name }
}

fn render_targets_by_first_usage(
    graph: &ParsedGraph,
    path: &ExecutionPath,
    usage: &GraphUsage,
) -> Vec<RenderTargetView> {
    let mut used: Vec<(u32, &RenderTarget, &TargetUsage)> = Vec::new();
    let mut rest: Vec<(&RenderTarget, &TargetUsage)> = Vec::new();
    for (rt, tu) in graph.render_targets.iter().zip(&usage.targets) {
        match tu.first_used.and_then(|n| path.order_of(n)) {
            Some(order) => used.push((order, rt, tu)),
            None => rest.push((rt, tu)),
        }
    }
    used.sort_by_key(|&(order, rt, _)| (order, rt.index));

    used.into_iter()
        .map(|(_, rt, tu)| render_target_view(graph, path, rt, tu))
        .chain(
            rest.into_iter()
                .map(|(rt, tu)| render_target_view(graph, path, rt, tu)),
        )
        .collect()
}

fn render_target_view(
    graph: &ParsedGraph,
    path: &ExecutionPath,
    rt: &RenderTarget,
    tu: &TargetUsage,
) -> RenderTargetView {
    let entries = |nodes: &std::collections::BTreeSet<u32>| -> Vec<UsageEntry> {
        let mut out: Vec<UsageEntry> = nodes
            .iter()
            .filter_map(|&n| tu.node_usage.get(&n).map(|records| (n, records)))
            .map(|(n, records)| usage_entry(graph, path, n, records))
            .collect();
        // Reached nodes ascending by order; unreached trail, by index.
        out.sort_by_key(|e| {
            if e.execution_order >= 0 {
                (e.execution_order, e.node_index)
            } else {
                (i64::MAX, e.node_index)
            }
        });
        out
    };

    RenderTargetView {
        index: rt.index,
        name: rt.name.clone(),
        format: rt.format,
        extent: rt.extent,
        mip_levels: rt.mip_levels,
        sample_count: rt.sample_count,
        usage: rt.usage.bits(),
        writers: entries(&tu.output_from_nodes),
        readers: entries(&tu.input_to_nodes),
        conditions: tu.conditions.iter().cloned().collect(),
        lifetime: LifetimeSummary {
            first_used_at_node: tu.first_used,
            last_used_at_node: tu.last_used,
            first_execution_order: tu.first_used.and_then(|n| path.order_of(n)),
            last_execution_order: tu.last_used.and_then(|n| path.order_of(n)),
        },
    }
}

fn usage_entry(
    graph: &ParsedGraph,
    path: &ExecutionPath,
    node_index: u32,
    records: &[Relationship],
) -> UsageEntry {
    let strongest = records
        .iter()
        .max_by_key(|r| r.priority)
        .expect("node_usage entries are never empty");
    let mut conditions: Vec<String> = records
        .iter()
        .flat_map(|r| r.conditions.iter().cloned())
        .collect();
    conditions.sort();
    conditions.dedup();

    UsageEntry {
        node_index,
        node_name: graph
            .node(node_index)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| format!("Node_{node_index}")),
        execution_order: order_or_minus_one(path, node_index),
        relationship: strongest.kind.label(),
        conditions,
    }
}

fn order_or_minus_one(path: &ExecutionPath, node: u32) -> i64 {
    path.order_of(node).map_or(-1, i64::from)
}
