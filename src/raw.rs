use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Raw graph dump as exported by the engine's debug layer.
///
/// Field names follow the wire format verbatim; everything below the four
/// top-level arrays is optional and defaulted, because dumps are frequently
/// partial or hand-edited.
#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RawGraphData {
    #[serde(default, rename = "renderTargetDescriptions")]
    pub render_target_descriptions: Vec<RawRenderTarget>,
    #[serde(default, rename = "renderPassDescriptions")]
    pub render_pass_descriptions: Vec<RawRenderPass>,
    #[serde(default, rename = "nodeDataDescriptions")]
    pub node_data_descriptions: Vec<RawNodeData>,
    // Entries are (passIndex, nodeIndex) pairs; kept as raw values so that
    // wrong-arity or non-numeric entries can be skipped instead of failing
    // the whole load.
    #[serde(default, rename = "graphOrder")]
    pub graph_order: Vec<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RawRenderTarget {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub format: u32,
    // Any arity is accepted; normalized to [x, y, z] at parse time (0 means
    // "scales with viewport").
    #[serde(default)]
    pub extent: Vec<u64>,
    #[serde(default = "default_one", rename = "mipLevels")]
    pub mip_levels: u32,
    #[serde(default = "default_one", rename = "sampleCount")]
    pub sample_count: u32,
    #[serde(default)]
    pub usage: u32,
    #[serde(default, rename = "memoryType")]
    pub memory_type: u32,
    #[serde(default = "default_color_aspect")]
    pub aspect: u32,
    #[serde(default, rename = "samplerType")]
    pub sampler_type: Option<u32>,
    #[serde(default, rename = "memoryUsage")]
    pub memory_usage: Option<u32>,
    #[serde(default)]
    pub tiling: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RawRenderPass {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "nodeIndices")]
    pub node_indices: Vec<i64>,
    #[serde(default, rename = "colorAttachmentIndices")]
    pub color_attachment_indices: Vec<i64>,
    #[serde(default, rename = "depthAttachmentIndex")]
    pub depth_attachment_index: Option<i64>,
    #[serde(default, rename = "resolveAttachmentIndices")]
    pub resolve_attachment_indices: Vec<i64>,
    #[serde(default)]
    pub conditions: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct RawNodeData {
    #[serde(default, rename = "nodeIndex")]
    pub node_index: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub node_type: u32,
    #[serde(default, rename = "inputRenderTargetIndices")]
    pub input_render_target_indices: Vec<i64>,
    #[serde(default, rename = "outputRenderTargetIndices")]
    pub output_render_target_indices: Vec<i64>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default, rename = "dataJson")]
    pub data_json: HashMap<String, serde_json::Value>,
}

fn default_one() -> u32 {
    1
}

fn default_color_aspect() -> u32 {
    1
}

/// Structural precondition for the whole pipeline. A dump without render
/// targets or node data has nothing to analyze; everything else (dangling
/// indices, malformed entries, unknown codes) is tolerated downstream.
///
/// Run this before [`crate::model::parse`]; the parser does not re-validate.
pub fn validate_raw(raw: &RawGraphData) -> Result<()> {
    if raw.render_target_descriptions.is_empty() {
        bail!("renderTargetDescriptions is missing or empty");
    }
    if raw.node_data_descriptions.is_empty() {
        bail!("nodeDataDescriptions is missing or empty");
    }
    Ok(())
}

pub fn load_graph_from_str(text: &str) -> Result<RawGraphData> {
    serde_json::from_str(text).context("failed to parse render graph json")
}

pub fn load_graph_from_path(path: impl AsRef<Path>) -> Result<RawGraphData> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read render graph json at {}", path.display()))?;
    load_graph_from_str(&text)
}
