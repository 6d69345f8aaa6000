use std::collections::BTreeMap;

use crate::codes::{ImageAspect, ImageUsage, NodeKind};
use crate::raw::{RawGraphData, RawNodeData, RawRenderPass, RawRenderTarget};

/// One GPU image resource. Immutable after parse; all usage-derived data
/// lives in [`crate::analysis::TargetUsage`].
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub index: u32,
    pub name: String,
    pub format: u32,
    pub extent: [u64; 3],
    pub mip_levels: u32,
    pub sample_count: u32,
    pub usage: ImageUsage,
    pub memory_type: u32,
    pub aspect: ImageAspect,
    pub sampler_type: Option<u32>,
    pub memory_usage: Option<u32>,
    pub tiling: Option<u32>,
}

/// One graph-execution unit (draw, compute, blit, ...).
///
/// `inputs`/`outputs` may contain external-resource sentinels or dangling
/// indices; both are kept verbatim so the validator can report the latter.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub index: u32,
    pub name: String,
    pub kind: NodeKind,
    pub inputs: Vec<u32>,
    pub outputs: Vec<u32>,
    pub conditions: Vec<String>,
    /// Free-form binding data; integer values encode shader-resource
    /// addresses. Sorted keys keep every downstream pass deterministic.
    pub bindings: BTreeMap<String, serde_json::Value>,
    /// First render pass whose member list contains this node.
    pub render_pass_index: Option<u32>,
}

/// A grouping of nodes sharing attachment context. `color_attachment_indices`
/// and `resolve_attachment_indices` are paired by position for MSAA resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPass {
    pub index: u32,
    pub name: String,
    pub node_indices: Vec<u32>,
    pub color_attachment_indices: Vec<u32>,
    pub depth_attachment_index: Option<u32>,
    pub resolve_attachment_indices: Vec<u32>,
    pub conditions: Vec<String>,
}

/// One graph-order entry. `pass` is None for standalone nodes (-1 on the
/// wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderEntry {
    pub pass: Option<u32>,
    pub node: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ParsedGraph {
    pub render_targets: Vec<RenderTarget>,
    /// Keyed by the explicit wire `nodeIndex`, which need not be contiguous.
    pub nodes: BTreeMap<u32, Node>,
    pub render_passes: Vec<RenderPass>,
    pub graph_order: Vec<OrderEntry>,
}

impl ParsedGraph {
    pub fn render_target(&self, index: u32) -> Option<&RenderTarget> {
        self.render_targets.get(index as usize)
    }

    pub fn node(&self, index: u32) -> Option<&Node> {
        self.nodes.get(&index)
    }

    pub fn render_pass(&self, index: u32) -> Option<&RenderPass> {
        self.render_passes.get(index as usize)
    }

    pub fn render_target_count(&self) -> u32 {
        self.render_targets.len() as u32
    }
}

/// Builds the typed model from a raw dump. Never fails: per-entry problems
/// resolve to defaults or get dropped, per the tolerance contract checked by
/// [`crate::raw::validate_raw`] beforehand.
pub fn parse(raw: &RawGraphData) -> ParsedGraph {
    let render_targets: Vec<RenderTarget> = raw
        .render_target_descriptions
        .iter()
        .enumerate()
        .map(|(i, rt)| parse_render_target(i as u32, rt))
        .collect();

    let render_passes: Vec<RenderPass> = raw
        .render_pass_descriptions
        .iter()
        .enumerate()
        .map(|(i, rp)| parse_render_pass(i as u32, rp))
        .collect();

    let mut nodes: BTreeMap<u32, Node> = BTreeMap::new();
    for data in &raw.node_data_descriptions {
        let Ok(index) = u32::try_from(data.node_index) else {
            log::debug!("skipping node data with invalid nodeIndex {}", data.node_index);
            continue;
        };
        nodes.insert(index, parse_node(index, data, &render_passes));
    }

    let graph_order = raw
        .graph_order
        .iter()
        .filter_map(decode_order_entry)
        .collect();

    ParsedGraph {
        render_targets,
        nodes,
        render_passes,
        graph_order,
    }
}

fn parse_render_target(index: u32, raw: &RawRenderTarget) -> RenderTarget {
    let mut extent = [0u64; 3];
    for (slot, value) in extent.iter_mut().zip(raw.extent.iter()) {
        *slot = *value;
    }

    RenderTarget {
        index,
        name: raw.name.clone().unwrap_or_else(|| format!("RT_{index}")),
        format: raw.format,
        extent,
        mip_levels: raw.mip_levels,
        sample_count: raw.sample_count,
        usage: ImageUsage::from_bits_retain(raw.usage),
        memory_type: raw.memory_type,
        aspect: ImageAspect::from_bits_retain(raw.aspect),
        sampler_type: raw.sampler_type,
        memory_usage: raw.memory_usage,
        tiling: raw.tiling,
    }
}

fn parse_render_pass(index: u32, raw: &RawRenderPass) -> RenderPass {
    RenderPass {
        index,
        name: raw
            .name
            .clone()
            .unwrap_or_else(|| format!("RenderPass_{index}")),
        node_indices: to_u32_indices(&raw.node_indices),
        color_attachment_indices: to_u32_indices(&raw.color_attachment_indices),
        depth_attachment_index: raw
            .depth_attachment_index
            .and_then(|i| u32::try_from(i).ok()),
        resolve_attachment_indices: to_u32_indices(&raw.resolve_attachment_indices),
        conditions: raw.conditions.clone(),
    }
}

fn parse_node(index: u32, raw: &RawNodeData, render_passes: &[RenderPass]) -> Node {
    // First pass whose member list contains this node wins.
    let render_pass_index = render_passes
        .iter()
        .find(|p| p.node_indices.contains(&index))
        .map(|p| p.index);

    Node {
        index,
        name: raw.name.clone().unwrap_or_else(|| format!("Node_{index}")),
        kind: NodeKind::from_code(raw.node_type),
        inputs: to_u32_indices(&raw.input_render_target_indices),
        outputs: to_u32_indices(&raw.output_render_target_indices),
        conditions: raw.conditions.clone(),
        bindings: raw
            .data_json
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        render_pass_index,
    }
}

fn to_u32_indices(values: &[i64]) -> Vec<u32> {
    values
        .iter()
        .filter_map(|&v| u32::try_from(v).ok())
        .collect()
}

fn decode_order_entry(entry: &serde_json::Value) -> Option<OrderEntry> {
    let arr = entry.as_array()?;
    if arr.len() != 2 {
        return None;
    }
    let pass = arr[0].as_i64()?;
    let node = u32::try_from(arr[1].as_i64()?).ok()?;
    let pass = match pass {
        -1 => None,
        p => Some(u32::try_from(p).ok()?),
    };
    Some(OrderEntry { pass, node })
}
