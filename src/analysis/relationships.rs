//! Relationship enumeration and read/write classification.
//!
//! Every (render target, node) pair collects all potential relationships from
//! four independent sources: explicit node I/O, decoded shader bindings,
//! render-pass attachments, and synthetic MSAA resolve pairs. The full record
//! list is kept for detail views; a separate verdict decides whether the node
//! counts as a reader or a writer of the target.

use std::collections::BTreeMap;

use crate::analysis::bindings::{BindingKind, decode_binding_value};
use crate::model::{ParsedGraph, RenderPass};

/// Priorities are declarative weights retained on every record for consumers;
/// the read/write verdict does not compare them (see `counts_as_write`). The
/// view layer uses them to pick the displayed relationship kind.
pub const PRIORITY_ATTACHMENT: u32 = 50;
pub const PRIORITY_MSAA_RESOLVE: u32 = 45;
pub const PRIORITY_NODE_INPUT: u32 = 40;
pub const PRIORITY_NODE_OUTPUT: u32 = 30;
pub const PRIORITY_BINDING_READ: u32 = 20;
pub const PRIORITY_BINDING_WRITE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn label(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    NodeInput,
    NodeOutput,
    ShaderBinding,
    ColorAttachment,
    DepthAttachment,
    ResolveAttachment,
    MsaaResolveSource,
    MsaaResolveTarget,
}

impl RelationshipKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::NodeInput => "node_input",
            Self::NodeOutput => "node_output",
            Self::ShaderBinding => "shader_binding",
            Self::ColorAttachment => "color_attachment",
            Self::DepthAttachment => "depth_attachment",
            Self::ResolveAttachment => "resolve_attachment",
            Self::MsaaResolveSource => "msaa_resolve_source",
            Self::MsaaResolveTarget => "msaa_resolve_target",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderBindingRef {
    pub key: String,
    pub encoded_address: u64,
    pub kind: BindingKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassRef {
    pub name: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub priority: u32,
    pub access: Access,
    pub binding: Option<ShaderBindingRef>,
    pub pass: Option<PassRef>,
    /// For MSAA resolve records: the paired color (source) or resolve
    /// (target) render-target index.
    pub resolve_partner: Option<u32>,
    pub conditions: Vec<String>,
}

impl Relationship {
    /// The write verdict is type membership, not priority comparison: any
    /// attachment, resolve-target, explicit-output, or writing shader binding
    /// makes the node a writer of the target.
    pub fn counts_as_write(&self) -> bool {
        match self.kind {
            RelationshipKind::ColorAttachment
            | RelationshipKind::DepthAttachment
            | RelationshipKind::ResolveAttachment
            | RelationshipKind::MsaaResolveTarget
            | RelationshipKind::NodeOutput => true,
            RelationshipKind::ShaderBinding => {
                self.binding.as_ref().is_some_and(|b| b.kind.writes())
            }
            RelationshipKind::NodeInput | RelationshipKind::MsaaResolveSource => false,
        }
    }

    fn io(kind: RelationshipKind, priority: u32, access: Access, conditions: &[String]) -> Self {
        Self {
            kind,
            priority,
            access,
            binding: None,
            pass: None,
            resolve_partner: None,
            conditions: conditions.to_vec(),
        }
    }

    fn attachment(
        kind: RelationshipKind,
        access: Access,
        pass: &RenderPass,
        resolve_partner: Option<u32>,
    ) -> Self {
        let priority = match kind {
            RelationshipKind::MsaaResolveSource | RelationshipKind::MsaaResolveTarget => {
                PRIORITY_MSAA_RESOLVE
            }
            _ => PRIORITY_ATTACHMENT,
        };
        Self {
            kind,
            priority,
            access,
            binding: None,
            pass: Some(PassRef {
                name: pass.name.clone(),
                index: pass.index,
            }),
            resolve_partner,
            conditions: pass.conditions.clone(),
        }
    }
}

/// Enumerates all potential relationships, keyed by (render target, node).
/// Only targets inside the parsed set produce records; sentinel and dangling
/// indices are silently skipped here (the validator reports dangling ones).
pub(crate) fn collect_relationships(
    graph: &ParsedGraph,
) -> BTreeMap<(u32, u32), Vec<Relationship>> {
    let mut records: BTreeMap<(u32, u32), Vec<Relationship>> = BTreeMap::new();
    let target_count = graph.render_target_count();

    let mut push = |target: u32, node: u32, relationship: Relationship| {
        records.entry((target, node)).or_default().push(relationship);
    };

    for (&node_index, node) in &graph.nodes {
        for &target in &node.inputs {
            if target < target_count {
                push(
                    target,
                    node_index,
                    Relationship::io(
                        RelationshipKind::NodeInput,
                        PRIORITY_NODE_INPUT,
                        Access::Read,
                        &node.conditions,
                    ),
                );
            }
        }
        for &target in &node.outputs {
            if target < target_count {
                push(
                    target,
                    node_index,
                    Relationship::io(
                        RelationshipKind::NodeOutput,
                        PRIORITY_NODE_OUTPUT,
                        Access::Write,
                        &node.conditions,
                    ),
                );
            }
        }
        for (key, value) in &node.bindings {
            let Some((kind, target)) = decode_binding_value(value) else {
                continue;
            };
            if target >= target_count {
                continue;
            }
            let (access, priority) = if kind.writes() {
                (Access::Write, PRIORITY_BINDING_WRITE)
            } else {
                (Access::Read, PRIORITY_BINDING_READ)
            };
            push(
                target,
                node_index,
                Relationship {
                    kind: RelationshipKind::ShaderBinding,
                    priority,
                    access,
                    binding: Some(ShaderBindingRef {
                        key: key.clone(),
                        encoded_address: value.as_u64().unwrap_or(0),
                        kind,
                    }),
                    pass: None,
                    resolve_partner: None,
                    conditions: node.conditions.clone(),
                },
            );
        }
    }

    for pass in &graph.render_passes {
        for &node_index in &pass.node_indices {
            if !graph.nodes.contains_key(&node_index) {
                continue;
            }
            for &color in &pass.color_attachment_indices {
                if color < target_count {
                    push(
                        color,
                        node_index,
                        Relationship::attachment(
                            RelationshipKind::ColorAttachment,
                            Access::Write,
                            pass,
                            None,
                        ),
                    );
                }
            }
            if let Some(depth) = pass.depth_attachment_index {
                if depth < target_count {
                    push(
                        depth,
                        node_index,
                        Relationship::attachment(
                            RelationshipKind::DepthAttachment,
                            Access::Write,
                            pass,
                            None,
                        ),
                    );
                }
            }
            for &resolve in &pass.resolve_attachment_indices {
                if resolve < target_count {
                    push(
                        resolve,
                        node_index,
                        Relationship::attachment(
                            RelationshipKind::ResolveAttachment,
                            Access::Write,
                            pass,
                            None,
                        ),
                    );
                }
            }
            // color[i]/resolve[i] are paired by position; model the implicit
            // resolve copy on both ends.
            for (i, &color) in pass.color_attachment_indices.iter().enumerate() {
                let Some(&resolve) = pass.resolve_attachment_indices.get(i) else {
                    continue;
                };
                if color >= target_count || resolve >= target_count {
                    continue;
                }
                push(
                    color,
                    node_index,
                    Relationship::attachment(
                        RelationshipKind::MsaaResolveSource,
                        Access::Read,
                        pass,
                        Some(resolve),
                    ),
                );
                push(
                    resolve,
                    node_index,
                    Relationship::attachment(
                        RelationshipKind::MsaaResolveTarget,
                        Access::Write,
                        pass,
                        Some(color),
                    ),
                );
            }
        }
    }

    records
}
