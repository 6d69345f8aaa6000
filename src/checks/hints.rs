//! Optimization hints. Never errors; these point at memory that could be
//! saved, not at bugs.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;

use crate::codes::ImageUsage;

use super::{ALIASING_OPPORTUNITY, CheckContext, Issue, MISSING_TRANSIENT_FLAG};

pub(super) fn transient_attachments(ctx: &CheckContext) -> Vec<Issue> {
    let mut issues = Vec::new();
    for (rt, usage) in ctx.graph.render_targets.iter().zip(&ctx.usage.targets) {
        if rt.sample_count <= 1 || rt.usage.contains(ImageUsage::TRANSIENT_ATTACHMENT) {
            continue;
        }
        let passes: BTreeSet<u32> = usage
            .color_uses
            .iter()
            .chain(&usage.depth_uses)
            .chain(&usage.resolve_uses)
            .map(|u| u.pass_index)
            .collect();
        if passes.len() != 1 {
            continue;
        }
        issues.push(Issue::info(
            MISSING_TRANSIENT_FLAG,
            format!(
                "MSAA render target '{}' lives only in pass {} and could be TRANSIENT",
                rt.name,
                passes.iter().next().unwrap()
            ),
            json!({ "render_target": rt.index, "sample_count": rt.sample_count }),
        ));
    }
    issues
}

/// Pairwise within groups of identical (format, extent, sampleCount,
/// mipLevels): disjoint execution-order lifetimes mean the two images could
/// share memory. Quadratic within a group, which is fine at the graph sizes
/// this tool sees.
pub(super) fn aliasing_opportunities(ctx: &CheckContext) -> Vec<Issue> {
    let mut groups: BTreeMap<(u32, [u64; 3], u32, u32), Vec<u32>> = BTreeMap::new();
    for rt in &ctx.graph.render_targets {
        groups
            .entry((rt.format, rt.extent, rt.sample_count, rt.mip_levels))
            .or_default()
            .push(rt.index);
    }

    let lifetime = |index: u32| -> Option<(u32, u32)> {
        let usage = ctx.usage.target(index)?;
        let first = ctx.path.order_of(usage.first_used?)?;
        let last = ctx.path.order_of(usage.last_used?)?;
        Some((first, last))
    };

    let mut issues = Vec::new();
    for members in groups.values() {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                let (Some((a_first, a_last)), Some((b_first, b_last))) =
                    (lifetime(a), lifetime(b))
                else {
                    continue;
                };
                let disjoint = a_last < b_first || b_last < a_first;
                if !disjoint || copied_between(ctx, a, b) {
                    continue;
                }
                let a_name = &ctx.graph.render_targets[a as usize].name;
                let b_name = &ctx.graph.render_targets[b as usize].name;
                issues.push(Issue::info(
                    ALIASING_OPPORTUNITY,
                    format!(
                        "render targets '{a_name}' and '{b_name}' have identical shapes and disjoint lifetimes and could alias"
                    ),
                    json!({
                        "render_targets": [a, b],
                        "lifetimes": [[a_first, a_last], [b_first, b_last]],
                    }),
                ));
            }
        }
    }
    issues
}

/// True when some node reads one target of the pair while writing the other;
/// aliasing would turn that copy into a self-overwrite.
fn copied_between(ctx: &CheckContext, a: u32, b: u32) -> bool {
    let (Some(ua), Some(ub)) = (ctx.usage.target(a), ctx.usage.target(b)) else {
        return false;
    };
    ua.input_to_nodes
        .iter()
        .any(|n| ub.output_from_nodes.contains(n))
        || ub.input_to_nodes
            .iter()
            .any(|n| ua.output_from_nodes.contains(n))
}
