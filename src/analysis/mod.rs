//! Usage analysis over the parsed graph: relationship collection, read/write
//! classification, attachment membership, and lifetimes.
//!
//! All passes are pure with respect to the parsed entities; derived data
//! lives here so re-analysis never aliases a previous run's results.

pub mod bindings;
pub mod lifetime;
pub mod relationships;

use std::collections::{BTreeMap, BTreeSet};

pub use bindings::BindingKind;
pub use lifetime::compute_lifetimes;
pub use relationships::{Access, PassRef, Relationship, RelationshipKind, ShaderBindingRef};

use crate::model::ParsedGraph;
use relationships::collect_relationships;

/// One attachment use of a render target, deduplicated per render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentUse {
    pub pass_name: String,
    pub pass_index: u32,
    pub node_indices: Vec<u32>,
    pub conditions: Vec<String>,
}

/// Derived usage data for one render target, parallel to
/// `ParsedGraph::render_targets`.
#[derive(Debug, Clone, Default)]
pub struct TargetUsage {
    /// Nodes classified as readers. Disjoint from `output_from_nodes`.
    pub input_to_nodes: BTreeSet<u32>,
    /// Nodes classified as writers.
    pub output_from_nodes: BTreeSet<u32>,
    /// The complete relationship-record list per node, for detail views.
    pub node_usage: BTreeMap<u32, Vec<Relationship>>,
    pub color_uses: Vec<AttachmentUse>,
    pub depth_uses: Vec<AttachmentUse>,
    pub resolve_uses: Vec<AttachmentUse>,
    pub conditions: BTreeSet<String>,
    pub first_used: Option<u32>,
    pub last_used: Option<u32>,
}

impl TargetUsage {
    pub fn is_unused(&self) -> bool {
        self.input_to_nodes.is_empty() && self.output_from_nodes.is_empty()
    }

    pub fn is_attachment(&self) -> bool {
        !self.color_uses.is_empty() || !self.depth_uses.is_empty() || !self.resolve_uses.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphUsage {
    pub targets: Vec<TargetUsage>,
}

impl GraphUsage {
    pub fn target(&self, index: u32) -> Option<&TargetUsage> {
        self.targets.get(index as usize)
    }
}

/// Runs relationship collection and the read/write verdict. Lifetimes are a
/// separate pass ([`compute_lifetimes`]) because they need the execution
/// order.
pub fn analyze_usage(graph: &ParsedGraph) -> GraphUsage {
    let mut targets: Vec<TargetUsage> = graph
        .render_targets
        .iter()
        .map(|_| TargetUsage::default())
        .collect();

    for ((target_index, node_index), records) in collect_relationships(graph) {
        let target = &mut targets[target_index as usize];

        // Exclusive verdict: a node is a writer if any record qualifies,
        // a reader otherwise. It never lands in both sets.
        if records.iter().any(Relationship::counts_as_write) {
            target.output_from_nodes.insert(node_index);
        } else {
            target.input_to_nodes.insert(node_index);
        }

        for record in &records {
            target
                .conditions
                .extend(record.conditions.iter().cloned());
            let Some(pass) = &record.pass else {
                continue;
            };
            let list = match record.kind {
                RelationshipKind::ColorAttachment => &mut target.color_uses,
                RelationshipKind::DepthAttachment => &mut target.depth_uses,
                RelationshipKind::ResolveAttachment => &mut target.resolve_uses,
                _ => continue,
            };
            if list.iter().any(|u| u.pass_index == pass.index) {
                continue;
            }
            let members = graph
                .render_pass(pass.index)
                .map(|p| p.node_indices.clone())
                .unwrap_or_default();
            list.push(AttachmentUse {
                pass_name: pass.name.clone(),
                pass_index: pass.index,
                node_indices: members,
                conditions: record.conditions.clone(),
            });
        }

        target.node_usage.insert(node_index, records);
    }

    GraphUsage { targets }
}
