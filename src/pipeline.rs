//! End-to-end analysis: validate -> parse -> compile -> analyze -> lifetimes.

use anyhow::Result;

use crate::analysis::{GraphUsage, analyze_usage, compute_lifetimes};
use crate::checks::{ValidationReport, run_all_checks};
use crate::execution::{ExecutionPath, compile_execution_path};
use crate::model::{ParsedGraph, parse};
use crate::raw::{RawGraphData, validate_raw};
use crate::view::{ViewModel, project_view};

/// Everything one analysis run derives from a raw dump. Owns all its data, so
/// independent analyses can run on different threads without coordination.
#[derive(Debug, Clone)]
pub struct GraphAnalysis {
    pub graph: ParsedGraph,
    pub path: ExecutionPath,
    pub usage: GraphUsage,
}

impl GraphAnalysis {
    pub fn view(&self) -> ViewModel {
        project_view(&self.graph, &self.path, &self.usage)
    }

    /// Pass the raw dump back in to enable the naming-semantics check.
    pub fn check(&self, raw: Option<&RawGraphData>) -> ValidationReport {
        run_all_checks(&self.graph, &self.path, &self.usage, raw)
    }
}

/// Runs the full pipeline synchronously. The only failure is the structural
/// precondition on the raw dump; every later stage is total.
pub fn analyze_graph(raw: &RawGraphData) -> Result<GraphAnalysis> {
    validate_raw(raw)?;

    let graph = parse(raw);
    let path = compile_execution_path(&graph);
    let mut usage = analyze_usage(&graph);
    compute_lifetimes(&mut usage, &path);

    log::debug!(
        "analyzed graph: {} render targets, {} nodes ({} reachable), {} passes",
        graph.render_targets.len(),
        graph.nodes.len(),
        path.len(),
        graph.render_passes.len(),
    );

    Ok(GraphAnalysis { graph, path, usage })
}
