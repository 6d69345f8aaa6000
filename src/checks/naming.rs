//! Naming/semantic heuristic over shader bindings.
//!
//! Re-decodes each node's binding map from the raw dump and compares what the
//! binding key claims to carry against what the bound render target's name
//! says it is. Both sides reduce to a set of rendering concepts; the check is
//! intentionally permissive and stays quiet whenever either side has no
//! recognized concept.

use serde_json::json;

use crate::analysis::bindings::decode_binding_value;

use super::{COORDINATE_SPACE_MISMATCH, CheckContext, Issue, SEMANTIC_MISMATCH};

/// Rendering vocabulary matched by substring against stripped identifiers.
const CONCEPTS: &[&str] = &[
    "albedo",
    "diffuse",
    "normal",
    "tangent",
    "depth",
    "stencil",
    "shadow",
    "occlusion",
    "ssao",
    "color",
    "hdr",
    "bloom",
    "blur",
    "velocity",
    "motion",
    "gbuffer",
    "light",
    "specular",
    "roughness",
    "metallic",
    "emissive",
    "reflection",
    "refraction",
    "ui",
    "overlay",
    "composite",
    "tonemap",
    "luminance",
    "exposure",
    "fog",
    "volumetric",
    "particle",
    "sky",
    "water",
    "outline",
    "mask",
    "noise",
    "history",
];

/// Concepts inside one group are close enough to bind to each other.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["albedo", "diffuse", "color"],
    &["occlusion", "ssao", "shadow"],
    &["velocity", "motion"],
    &["luminance", "exposure", "hdr"],
    &["bloom", "blur"],
    &["fog", "volumetric"],
    &["ui", "overlay"],
];

const SPACE_PREFIXES: &[&str] = &["vs_", "ws_", "cs_", "os_", "ts_", "ls_"];

const RESOURCE_SUFFIXES: &[&str] = &[
    "_map",
    "_tex",
    "_texture",
    "_target",
    "_rt",
    "_buffer",
    "_image",
    "_attachment",
    "_srv",
    "_uav",
];

#[derive(Debug, PartialEq)]
struct Identifier {
    concepts: Vec<&'static str>,
    space: Option<&'static str>,
}

fn classify(raw_name: &str) -> Identifier {
    let mut name = raw_name.to_ascii_lowercase();

    let space = SPACE_PREFIXES
        .iter()
        .find(|p| name.starts_with(**p))
        .copied();
    if let Some(prefix) = space {
        name = name[prefix.len()..].to_string();
    }
    if let Some(suffix) = RESOURCE_SUFFIXES.iter().find(|s| name.ends_with(**s)) {
        name.truncate(name.len() - suffix.len());
    }

    Identifier {
        concepts: CONCEPTS
            .iter()
            .filter(|c| name.contains(**c))
            .copied()
            .collect(),
        space,
    }
}

fn related(a: &str, b: &str) -> bool {
    a == b
        || SYNONYM_GROUPS
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
}

fn compatible(binding: &Identifier, target: &Identifier) -> bool {
    if binding.concepts.is_empty() || target.concepts.is_empty() {
        return true;
    }
    binding
        .concepts
        .iter()
        .any(|a| target.concepts.iter().any(|b| related(a, b)))
}

pub(super) fn binding_semantics(ctx: &CheckContext) -> Vec<Issue> {
    let Some(raw) = ctx.raw else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    for data in &raw.node_data_descriptions {
        let Ok(node_index) = u32::try_from(data.node_index) else {
            continue;
        };
        let mut keys: Vec<&String> = data.data_json.keys().collect();
        keys.sort();
        for key in keys {
            let Some((_, target_index)) = decode_binding_value(&data.data_json[key]) else {
                continue;
            };
            let Some(rt) = ctx.graph.render_target(target_index) else {
                continue;
            };

            let binding_id = classify(key);
            let target_id = classify(&rt.name);

            if !compatible(&binding_id, &target_id) {
                issues.push(Issue::error(
                    SEMANTIC_MISMATCH,
                    format!(
                        "node {node_index} binds '{}' to render target '{}' whose name suggests different content",
                        key, rt.name
                    ),
                    json!({
                        "node": node_index,
                        "binding_key": key,
                        "render_target": rt.index,
                        "binding_concepts": binding_id.concepts,
                        "target_concepts": target_id.concepts,
                    }),
                ));
            }

            if let (Some(binding_space), Some(target_space)) = (binding_id.space, target_id.space)
            {
                if binding_space != target_space {
                    issues.push(Issue::warning(
                        COORDINATE_SPACE_MISMATCH,
                        format!(
                            "node {node_index} binds '{}' ({}) to render target '{}' ({})",
                            key,
                            binding_space.trim_end_matches('_'),
                            rt.name,
                            target_space.trim_end_matches('_'),
                        ),
                        json!({
                            "node": node_index,
                            "binding_key": key,
                            "render_target": rt.index,
                            "binding_space": binding_space,
                            "target_space": target_space,
                        }),
                    ));
                }
            }
        }
    }
    issues
}
