//! Orphan detection: resources and nodes that exist but take no part in the
//! graph, or take part in a one-sided way.

use serde_json::json;

use crate::analysis::bindings::decode_binding_value;
use crate::codes::{ImageAspect, NodeKind};

use super::{
    CheckContext, EXTERNAL_INPUT_NAME_HINTS, ISOLATED_NODE, Issue, OUTPUT_NAME_HINTS,
    READ_ONLY_RENDER_TARGET, UNUSED_RENDER_TARGET, WRITE_ONLY_RENDER_TARGET, name_matches,
};

pub(super) fn unused_render_targets(ctx: &CheckContext) -> Vec<Issue> {
    ctx.graph
        .render_targets
        .iter()
        .zip(&ctx.usage.targets)
        .filter(|(_, usage)| usage.is_unused())
        .map(|(rt, _)| {
            Issue::warning(
                UNUSED_RENDER_TARGET,
                format!("render target '{}' is never read or written", rt.name),
                json!({ "render_target": rt.index, "name": rt.name }),
            )
        })
        .collect()
}

pub(super) fn write_only_render_targets(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if usage.output_from_nodes.is_empty() || !usage.input_to_nodes.is_empty() {
            continue;
        }
        if name_matches(&rt.name, OUTPUT_NAME_HINTS) {
            continue;
        }
        // MSAA color and depth attachments are consumed by fixed-function
        // hardware inside their own pass; never-read is their normal state.
        let implicit_consumer =
            rt.sample_count > 1 || rt.aspect.contains(ImageAspect::DEPTH);
        if implicit_consumer && usage.is_attachment() {
            continue;
        }
        issues.push(Issue::warning(
            WRITE_ONLY_RENDER_TARGET,
            format!("render target '{}' is written but never read", rt.name),
            json!({
                "render_target": rt.index,
                "name": rt.name,
                "writers": usage.output_from_nodes.iter().copied().collect::<Vec<_>>(),
            }),
        ));
    }
    issues
}

pub(super) fn read_only_render_targets(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if usage.input_to_nodes.is_empty() || !usage.output_from_nodes.is_empty() {
            continue;
        }
        if name_matches(&rt.name, EXTERNAL_INPUT_NAME_HINTS) {
            continue;
        }
        // A read with no writer anywhere is a logic bug, not a style issue.
        issues.push(Issue::error(
            READ_ONLY_RENDER_TARGET,
            format!("render target '{}' is read but never written", rt.name),
            json!({
                "render_target": rt.index,
                "name": rt.name,
                "readers": usage.input_to_nodes.iter().copied().collect::<Vec<_>>(),
            }),
        ));
    }
    issues
}

pub(super) fn isolated_nodes(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for node in ctx.graph.nodes.values() {
        if node.kind == NodeKind::Viewport {
            continue;
        }
        if node.render_pass_index.is_some()
            || !node.inputs.is_empty()
            || !node.outputs.is_empty()
        {
            continue;
        }
        let has_binding = node
            .bindings
            .values()
            .any(|v| decode_binding_value(v).is_some());
        if has_binding {
            continue;
        }
        issues.push(Issue::warning(
            ISOLATED_NODE,
            format!(
                "node '{}' has no inputs, outputs, bindings, or render pass",
                node.name
            ),
            json!({ "node": node.index, "name": node.name }),
        ));
    }
    issues
}
