//! Consistency checks over an analyzed graph.
//!
//! Checks are independent, side-effect-free, and order-insensitive: each one
//! reads the shared analyzed model and returns findings as data. Findings are
//! never runtime errors; the caller decides how to present them. The runner
//! isolates every check so one bad rule cannot abort validation.

mod formats;
mod hints;
mod naming;
mod ordering;
mod orphans;
mod structure;

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;

use crate::analysis::GraphUsage;
use crate::execution::ExecutionPath;
use crate::model::ParsedGraph;
use crate::raw::RawGraphData;

pub const UNUSED_RENDER_TARGET: &str = "UNUSED_RENDER_TARGET";
pub const WRITE_ONLY_RENDER_TARGET: &str = "WRITE_ONLY_RENDER_TARGET";
pub const READ_ONLY_RENDER_TARGET: &str = "READ_ONLY_RENDER_TARGET";
pub const ISOLATED_NODE: &str = "ISOLATED_NODE";
pub const MISSING_RENDER_TARGET: &str = "MISSING_RENDER_TARGET";
pub const MISSING_NODE: &str = "MISSING_NODE";
pub const MISSING_ATTACHMENT_USAGE: &str = "MISSING_ATTACHMENT_USAGE";
pub const INVALID_ATTACHMENT_FORMAT: &str = "INVALID_ATTACHMENT_FORMAT";
pub const INVALID_RESOLVE_SAMPLE_COUNT: &str = "INVALID_RESOLVE_SAMPLE_COUNT";
pub const EMPTY_RENDER_PASS: &str = "EMPTY_RENDER_PASS";
pub const BLIT_FORMAT_MISMATCH: &str = "BLIT_FORMAT_MISMATCH";
pub const BLIT_SAMPLE_COUNT_MISMATCH: &str = "BLIT_SAMPLE_COUNT_MISMATCH";
pub const MISSING_STORAGE_FLAG: &str = "MISSING_STORAGE_FLAG";
pub const MISSING_SAMPLED_FLAG: &str = "MISSING_SAMPLED_FLAG";
pub const READ_BEFORE_WRITE: &str = "READ_BEFORE_WRITE";
pub const MISSING_RESOURCE_BARRIER: &str = "MISSING_RESOURCE_BARRIER";
pub const MISSING_TRANSIENT_FLAG: &str = "MISSING_TRANSIENT_FLAG";
pub const ALIASING_OPPORTUNITY: &str = "ALIASING_OPPORTUNITY";
pub const MISSING_MIP_GENERATION: &str = "MISSING_MIP_GENERATION";
pub const WRITE_AFTER_MIP_GENERATION: &str = "WRITE_AFTER_MIP_GENERATION";
pub const SEMANTIC_MISMATCH: &str = "SEMANTIC_MISMATCH";
pub const COORDINATE_SPACE_MISMATCH: &str = "COORDINATE_SPACE_MISMATCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub severity: Severity,
    #[serde(rename = "type")]
    pub code: &'static str,
    pub message: String,
    pub details: serde_json::Value,
}

impl Issue {
    pub fn error(code: &'static str, message: String, details: serde_json::Value) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message,
            details,
        }
    }

    pub fn warning(code: &'static str, message: String, details: serde_json::Value) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message,
            details,
        }
    }

    pub fn info(code: &'static str, message: String, details: serde_json::Value) -> Self {
        Self {
            severity: Severity::Info,
            code,
            message,
            details,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub total_issues: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub issues: Vec<Issue>,
}

pub struct CheckContext<'a> {
    pub graph: &'a ParsedGraph,
    pub path: &'a ExecutionPath,
    pub usage: &'a GraphUsage,
    /// Needed only by the naming heuristic, which re-decodes binding maps.
    pub raw: Option<&'a RawGraphData>,
}

type Check = fn(&CheckContext) -> Vec<Issue>;

const CHECKS: &[(&str, Check)] = &[
    ("unused_render_targets", orphans::unused_render_targets),
    ("write_only_render_targets", orphans::write_only_render_targets),
    ("read_only_render_targets", orphans::read_only_render_targets),
    ("isolated_nodes", orphans::isolated_nodes),
    ("missing_render_targets", structure::missing_render_targets),
    ("missing_nodes", structure::missing_nodes),
    ("attachment_flags", structure::attachment_flags),
    ("resolve_sample_counts", structure::resolve_sample_counts),
    ("empty_render_passes", structure::empty_render_passes),
    ("attachment_formats", formats::attachment_formats),
    ("blit_consistency", formats::blit_consistency),
    ("compute_storage_flags", formats::compute_storage_flags),
    ("sampled_flags", formats::sampled_flags),
    ("read_before_write", ordering::read_before_write),
    ("resource_barriers", ordering::resource_barriers),
    ("mip_generation", ordering::mip_generation),
    ("transient_attachments", hints::transient_attachments),
    ("aliasing_opportunities", hints::aliasing_opportunities),
    ("binding_semantics", naming::binding_semantics),
];

/// Runs every check and folds the findings into one flat report. A panicking
/// check loses its own findings only; the rest of the report is unaffected.
pub fn run_all_checks(
    graph: &ParsedGraph,
    path: &ExecutionPath,
    usage: &GraphUsage,
    raw: Option<&RawGraphData>,
) -> ValidationReport {
    let ctx = CheckContext {
        graph,
        path,
        usage,
        raw,
    };

    let mut issues: Vec<Issue> = Vec::new();
    for (name, check) in CHECKS {
        match catch_unwind(AssertUnwindSafe(|| check(&ctx))) {
            Ok(found) => issues.extend(found),
            Err(_) => log::warn!("validation check '{name}' panicked, its findings are dropped"),
        }
    }

    report_from(issues)
}

fn report_from(issues: Vec<Issue>) -> ValidationReport {
    let count = |severity: Severity| issues.iter().filter(|i| i.severity == severity).count();
    ValidationReport {
        total_issues: issues.len(),
        errors: count(Severity::Error),
        warnings: count(Severity::Warning),
        infos: count(Severity::Info),
        issues,
    }
}

/// Name patterns that mark a render target as an intended final output; a
/// write-only target matching one of these is not a finding.
pub(crate) const OUTPUT_NAME_HINTS: &[&str] = &[
    "output",
    "final",
    "swapchain",
    "backbuffer",
    "present",
    "display",
];

/// Name patterns for externally-produced inputs; a read with no writer is
/// expected for these.
pub(crate) const EXTERNAL_INPUT_NAME_HINTS: &[&str] =
    &["external", "import", "input", "history", "noise", "lut"];

pub(crate) fn name_matches(name: &str, hints: &[&str]) -> bool {
    let lower = name.to_ascii_lowercase();
    hints.iter().any(|h| lower.contains(h))
}
