//! Client-side analysis pipeline for engine render-graph dumps.
//!
//! The pipeline turns a raw JSON dump into a typed model, linearizes the
//! partial graph order into a total execution order, classifies every
//! (render target, node) relationship, derives per-target lifetimes, and
//! offers two consumer surfaces: a flat view projection for rendering layers
//! and a multi-rule consistency report.
//!
//! ```no_run
//! use render_graph_analyzer::{analyze_graph, load_graph_from_path};
//!
//! # fn main() -> anyhow::Result<()> {
//! let raw = load_graph_from_path("frame_dump.json")?;
//! let analysis = analyze_graph(&raw)?;
//! let view = analysis.view();
//! let report = analysis.check(Some(&raw));
//! println!("{} issues", report.total_issues);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod checks;
pub mod codes;
pub mod execution;
pub mod model;
pub mod pipeline;
pub mod raw;
pub mod view;

pub use checks::{Issue, Severity, ValidationReport, run_all_checks};
pub use execution::{ExecutionPath, compile_execution_path};
pub use model::{ParsedGraph, parse};
pub use pipeline::{GraphAnalysis, analyze_graph};
pub use raw::{RawGraphData, load_graph_from_path, load_graph_from_str, validate_raw};
pub use view::{ViewModel, project_view};
