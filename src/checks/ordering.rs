//! Lifetime and ordering rules over the compiled execution order.

use serde_json::json;

use crate::codes::NodeKind;

use super::{
    CheckContext, EXTERNAL_INPUT_NAME_HINTS, Issue, MISSING_MIP_GENERATION,
    MISSING_RESOURCE_BARRIER, READ_BEFORE_WRITE, WRITE_AFTER_MIP_GENERATION, name_matches,
};

pub(super) fn read_before_write(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if name_matches(&rt.name, EXTERNAL_INPUT_NAME_HINTS) {
            continue;
        }
        let first_read = usage
            .input_to_nodes
            .iter()
            .filter_map(|&n| ctx.path.order_of(n).map(|o| (o, n)))
            .min();
        let first_write = usage
            .output_from_nodes
            .iter()
            .filter_map(|&n| ctx.path.order_of(n))
            .min();
        let Some((read_order, reader)) = first_read else {
            continue;
        };
        if first_write.is_some_and(|write_order| write_order <= read_order) {
            continue;
        }
        issues.push(Issue::error(
            READ_BEFORE_WRITE,
            format!(
                "render target '{}' is read at execution order {read_order} before any write",
                rt.name
            ),
            json!({
                "render_target": rt.index,
                "reader": reader,
                "read_order": read_order,
                "first_write_order": first_write,
            }),
        ));
    }
    issues
}

/// Heuristic: consecutive uses flipping between read and write across pass
/// boundaries usually need a barrier between them. False positives are
/// expected; this is a prompt to look, not a verdict.
pub(super) fn resource_barriers(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        let mut uses: Vec<(u32, u32, bool)> = usage
            .node_usage
            .keys()
            .filter_map(|&n| {
                ctx.path
                    .order_of(n)
                    .map(|o| (o, n, usage.output_from_nodes.contains(&n)))
            })
            .collect();
        uses.sort();

        for pair in uses.windows(2) {
            let (_, prev_node, prev_writes) = pair[0];
            let (_, next_node, next_writes) = pair[1];
            if prev_writes == next_writes {
                continue;
            }
            let prev_pass = ctx.graph.node(prev_node).and_then(|n| n.render_pass_index);
            let next_pass = ctx.graph.node(next_node).and_then(|n| n.render_pass_index);
            if prev_pass == next_pass {
                continue;
            }
            issues.push(Issue::warning(
                MISSING_RESOURCE_BARRIER,
                format!(
                    "render target '{}' flips {} -> {} between nodes {} and {} in different passes",
                    rt.name,
                    if prev_writes { "write" } else { "read" },
                    if next_writes { "write" } else { "read" },
                    prev_node,
                    next_node
                ),
                json!({
                    "render_target": rt.index,
                    "from_node": prev_node,
                    "to_node": next_node,
                }),
            ));
        }
    }
    issues
}

pub(super) fn mip_generation(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if rt.mip_levels <= 1 || usage.is_unused() {
            continue;
        }
        let mip_orders: Vec<u32> = usage
            .node_usage
            .keys()
            .filter(|&&n| {
                ctx.graph
                    .node(n)
                    .is_some_and(|node| node.kind == NodeKind::MipmapGen)
            })
            .filter_map(|&n| ctx.path.order_of(n))
            .collect();

        let Some(&mip_order) = mip_orders.iter().max() else {
            issues.push(Issue::warning(
                MISSING_MIP_GENERATION,
                format!(
                    "render target '{}' has {} mip levels but no mip-generation node uses it",
                    rt.name, rt.mip_levels
                ),
                json!({ "render_target": rt.index, "mip_levels": rt.mip_levels }),
            ));
            continue;
        };

        for &writer in &usage.output_from_nodes {
            let is_mip_node = ctx
                .graph
                .node(writer)
                .is_some_and(|node| node.kind == NodeKind::MipmapGen);
            if is_mip_node {
                continue;
            }
            let Some(write_order) = ctx.path.order_of(writer) else {
                continue;
            };
            if write_order <= mip_order {
                continue;
            }
            issues.push(Issue::error(
                WRITE_AFTER_MIP_GENERATION,
                format!(
                    "node {writer} writes render target '{}' after its mips are generated",
                    rt.name
                ),
                json!({
                    "render_target": rt.index,
                    "writer": writer,
                    "write_order": write_order,
                    "mip_generation_order": mip_order,
                }),
            ));
        }
    }
    issues
}
