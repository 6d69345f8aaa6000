//! Type and format rules: attachment format classes, blit compatibility, and
//! usage flags required by the access patterns the analyzer found.

use serde_json::json;

use crate::analysis::RelationshipKind;
use crate::codes::{ImageUsage, NodeKind, is_color_format, is_depth_format};

use super::{
    BLIT_FORMAT_MISMATCH, BLIT_SAMPLE_COUNT_MISMATCH, CheckContext, INVALID_ATTACHMENT_FORMAT,
    Issue, MISSING_SAMPLED_FLAG, MISSING_STORAGE_FLAG,
};

pub(super) fn attachment_formats(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for pass in &ctx.graph.render_passes {
        let color_slots = pass
            .color_attachment_indices
            .iter()
            .chain(&pass.resolve_attachment_indices);
        for &index in color_slots {
            let Some(rt) = ctx.graph.render_target(index) else {
                continue;
            };
            if is_color_format(rt.format) {
                continue;
            }
            issues.push(Issue::error(
                INVALID_ATTACHMENT_FORMAT,
                format!(
                    "render target '{}' (format {}) is a color attachment of pass '{}' but has no color-class format",
                    rt.name, rt.format, pass.name
                ),
                json!({ "render_target": rt.index, "render_pass": pass.index, "format": rt.format }),
            ));
        }
        if let Some(depth) = pass.depth_attachment_index {
            if let Some(rt) = ctx.graph.render_target(depth) {
                if !is_depth_format(rt.format) {
                    issues.push(Issue::error(
                        INVALID_ATTACHMENT_FORMAT,
                        format!(
                            "render target '{}' (format {}) is the depth attachment of pass '{}' but has no depth-class format",
                            rt.name, rt.format, pass.name
                        ),
                        json!({ "render_target": rt.index, "render_pass": pass.index, "format": rt.format }),
                    ));
                }
            }
        }
    }
    issues
}

pub(super) fn blit_consistency(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for node in ctx.graph.nodes.values() {
        if node.kind != NodeKind::Blit {
            continue;
        }
        let src = node
            .inputs
            .iter()
            .find_map(|&i| ctx.graph.render_target(i));
        let dst = node
            .outputs
            .iter()
            .find_map(|&i| ctx.graph.render_target(i));
        let (Some(src), Some(dst)) = (src, dst) else {
            continue;
        };

        if src.format != dst.format {
            issues.push(Issue::error(
                BLIT_FORMAT_MISMATCH,
                format!(
                    "blit node '{}' copies '{}' (format {}) to '{}' (format {})",
                    node.name, src.name, src.format, dst.name, dst.format
                ),
                json!({
                    "node": node.index,
                    "source": src.index,
                    "destination": dst.index,
                    "source_format": src.format,
                    "destination_format": dst.format,
                }),
            ));
        }
        if src.sample_count != dst.sample_count {
            let details = json!({
                "node": node.index,
                "source": src.index,
                "destination": dst.index,
                "source_samples": src.sample_count,
                "destination_samples": dst.sample_count,
            });
            let message = format!(
                "blit node '{}' copies {}x samples to {}x",
                node.name, src.sample_count, dst.sample_count
            );
            // MSAA -> 1x through a plain blit is usually an intentional
            // resolve.
            if src.sample_count > 1 && dst.sample_count == 1 {
                issues.push(Issue::warning(BLIT_SAMPLE_COUNT_MISMATCH, message, details));
            } else {
                issues.push(Issue::error(BLIT_SAMPLE_COUNT_MISMATCH, message, details));
            }
        }
    }
    issues
}

pub(super) fn compute_storage_flags(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if rt.usage.contains(ImageUsage::STORAGE) {
            continue;
        }
        for &writer in &usage.output_from_nodes {
            let Some(node) = ctx.graph.node(writer) else {
                continue;
            };
            if !node.kind.is_compute() {
                continue;
            }
            issues.push(Issue::error(
                MISSING_STORAGE_FLAG,
                format!(
                    "compute node '{}' writes render target '{}' which lacks STORAGE usage",
                    node.name, rt.name
                ),
                json!({ "node": node.index, "render_target": rt.index }),
            ));
        }
    }
    issues
}

pub(super) fn sampled_flags(ctx: &CheckContext) -> Vec<Issue> {
    let readable = ImageUsage::SAMPLED | ImageUsage::STORAGE;
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if rt.usage.intersects(readable) {
            continue;
        }
        for &reader in &usage.input_to_nodes {
            let Some(records) = usage.node_usage.get(&reader) else {
                continue;
            };
            // Fixed-function resolve reads don't go through a descriptor.
            if records
                .iter()
                .all(|r| r.kind == RelationshipKind::MsaaResolveSource)
            {
                continue;
            }
            issues.push(Issue::error(
                MISSING_SAMPLED_FLAG,
                format!(
                    "node {} reads render target '{}' which has neither SAMPLED nor STORAGE usage",
                    reader, rt.name
                ),
                json!({ "node": reader, "render_target": rt.index }),
            ));
        }
    }
    issues
}
