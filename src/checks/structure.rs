//! Structural consistency between passes, nodes, and the render-target set.

use serde_json::json;

use crate::codes::{ImageAspect, ImageUsage, is_external_resource_index};
use crate::model::RenderPass;

use super::{
    CheckContext, EMPTY_RENDER_PASS, INVALID_RESOLVE_SAMPLE_COUNT, Issue,
    MISSING_ATTACHMENT_USAGE, MISSING_NODE, MISSING_RENDER_TARGET,
};

fn attachment_indices(pass: &RenderPass) -> Vec<(&'static str, u32)> {
    let mut out: Vec<(&'static str, u32)> = Vec::new();
    out.extend(pass.color_attachment_indices.iter().map(|&i| ("color", i)));
    if let Some(depth) = pass.depth_attachment_index {
        out.push(("depth", depth));
    }
    out.extend(
        pass.resolve_attachment_indices
            .iter()
            .map(|&i| ("resolve", i)),
    );
    out
}

pub(super) fn missing_render_targets(ctx: &CheckContext) -> Vec<Issue> {
    let count = ctx.graph.render_target_count();
    let mut issues = Vec::new();

    for pass in &ctx.graph.render_passes {
        for (slot, index) in attachment_indices(pass) {
            if index < count || is_external_resource_index(index) {
                continue;
            }
            issues.push(Issue::error(
                MISSING_RENDER_TARGET,
                format!(
                    "render pass '{}' references missing render target {index} as {slot} attachment",
                    pass.name
                ),
                json!({ "render_pass": pass.index, "render_target": index, "slot": slot }),
            ));
        }
    }

    for node in ctx.graph.nodes.values() {
        for (direction, list) in [("input", &node.inputs), ("output", &node.outputs)] {
            for &index in list {
                if index < count || is_external_resource_index(index) {
                    continue;
                }
                issues.push(Issue::error(
                    MISSING_RENDER_TARGET,
                    format!(
                        "node '{}' references missing render target {index} as {direction}",
                        node.name
                    ),
                    json!({ "node": node.index, "render_target": index, "direction": direction }),
                ));
            }
        }
    }

    issues
}

pub(super) fn missing_nodes(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for pass in &ctx.graph.render_passes {
        for &node in &pass.node_indices {
            if ctx.graph.nodes.contains_key(&node) {
                continue;
            }
            issues.push(Issue::error(
                MISSING_NODE,
                format!("render pass '{}' lists missing node {node}", pass.name),
                json!({ "render_pass": pass.index, "node": node }),
            ));
        }
    }
    issues
}

pub(super) fn attachment_flags(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for pass in &ctx.graph.render_passes {
        for (slot, index) in attachment_indices(pass) {
            let Some(rt) = ctx.graph.render_target(index) else {
                continue;
            };
            let (usage_flag, usage_name, aspect_flag, aspect_name) = match slot {
                "depth" => (
                    ImageUsage::DEPTH_STENCIL_ATTACHMENT,
                    "DEPTH_STENCIL_ATTACHMENT",
                    ImageAspect::DEPTH,
                    "depth",
                ),
                _ => (
                    ImageUsage::COLOR_ATTACHMENT,
                    "COLOR_ATTACHMENT",
                    ImageAspect::COLOR,
                    "color",
                ),
            };
            if !rt.usage.contains(usage_flag) {
                issues.push(Issue::error(
                    MISSING_ATTACHMENT_USAGE,
                    format!(
                        "render target '{}' is a {slot} attachment of pass '{}' but lacks {usage_name} usage",
                        rt.name, pass.name
                    ),
                    json!({
                        "render_target": rt.index,
                        "render_pass": pass.index,
                        "slot": slot,
                        "missing": usage_name,
                    }),
                ));
            }
            if !rt.aspect.contains(aspect_flag) {
                issues.push(Issue::error(
                    MISSING_ATTACHMENT_USAGE,
                    format!(
                        "render target '{}' is a {slot} attachment of pass '{}' but lacks the {aspect_name} aspect",
                        rt.name, pass.name
                    ),
                    json!({
                        "render_target": rt.index,
                        "render_pass": pass.index,
                        "slot": slot,
                        "missing": format!("{aspect_name} aspect"),
                    }),
                ));
            }
        }
    }
    issues
}

pub(super) fn resolve_sample_counts(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for pass in &ctx.graph.render_passes {
        for &index in &pass.resolve_attachment_indices {
            let Some(rt) = ctx.graph.render_target(index) else {
                continue;
            };
            if rt.sample_count == 1 {
                continue;
            }
            issues.push(Issue::error(
                INVALID_RESOLVE_SAMPLE_COUNT,
                format!(
                    "resolve attachment '{}' of pass '{}' has sample count {}, expected 1",
                    rt.name, pass.name, rt.sample_count
                ),
                json!({
                    "render_target": rt.index,
                    "render_pass": pass.index,
                    "sample_count": rt.sample_count,
                }),
            ));
        }
    }
    issues
}

pub(super) fn empty_render_passes(ctx: &CheckContext) -> Vec<Issue> {
    ctx.graph
        .render_passes
        .iter()
        .filter(|pass| pass.node_indices.is_empty())
        .map(|pass| {
            Issue::warning(
                EMPTY_RENDER_PASS,
                format!("render pass '{}' has no member nodes", pass.name),
                json!({ "render_pass": pass.index, "name": pass.name }),
            )
        })
        .collect()
}
