use render_graph_analyzer::checks;
use render_graph_analyzer::{RawGraphData, Severity, analyze_graph, load_graph_from_str};
use serde_json::json;

fn report_for(value: serde_json::Value) -> render_graph_analyzer::ValidationReport {
    let _ = env_logger::builder().is_test(true).try_init();
    let raw: RawGraphData = load_graph_from_str(&value.to_string()).unwrap();
    let analysis = analyze_graph(&raw).unwrap();
    analysis.check(Some(&raw))
}

fn codes_of(report: &render_graph_analyzer::ValidationReport) -> Vec<&str> {
    report.issues.iter().map(|i| i.code).collect()
}

#[test]
fn write_only_warning_fires_for_default_names_only() {
    let report = report_for(json!({
        "renderTargetDescriptions": [
            { "format": 109, "usage": 16 },
            { "name": "final_output", "format": 109, "usage": 16 },
        ],
        "renderPassDescriptions": [{
            "nodeIndices": [0],
            "colorAttachmentIndices": [0, 1],
        }],
        "nodeDataDescriptions": [{ "nodeIndex": 0 }],
        "graphOrder": [[0, 0]],
    }));

    let write_only: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.code == checks::WRITE_ONLY_RENDER_TARGET)
        .collect();
    assert_eq!(write_only.len(), 1, "issues: {:?}", codes_of(&report));
    assert_eq!(write_only[0].severity, Severity::Warning);
    assert_eq!(write_only[0].details["render_target"], json!(0));
}

#[test]
fn read_with_no_writer_is_an_error_twice_over() {
    let report = report_for(json!({
        "renderTargetDescriptions": [{ "format": 37, "usage": 4 }],
        "nodeDataDescriptions": [
            { "nodeIndex": 1, "inputRenderTargetIndices": [0] },
        ],
        "graphOrder": [[-1, 1]],
    }));

    let codes = codes_of(&report);
    assert!(codes.contains(&checks::READ_ONLY_RENDER_TARGET), "{codes:?}");
    assert!(codes.contains(&checks::READ_BEFORE_WRITE), "{codes:?}");
    for issue in &report.issues {
        if issue.code == checks::READ_ONLY_RENDER_TARGET {
            assert_eq!(issue.severity, Severity::Error);
        }
    }
    assert!(report.errors >= 2);
}

#[test]
fn msaa_resolve_pair_raises_no_sample_count_findings() {
    let report = report_for(json!({
        "renderTargetDescriptions": [
            { "name": "scene_ms", "format": 37, "sampleCount": 4, "usage": 16 },
            { "name": "scene_output", "format": 37, "sampleCount": 1, "usage": 16 },
        ],
        "renderPassDescriptions": [{
            "nodeIndices": [0],
            "colorAttachmentIndices": [0],
            "resolveAttachmentIndices": [1],
        }],
        "nodeDataDescriptions": [{ "nodeIndex": 0 }],
        "graphOrder": [[0, 0]],
    }));

    let codes = codes_of(&report);
    assert!(!codes.contains(&checks::INVALID_RESOLVE_SAMPLE_COUNT), "{codes:?}");
    assert!(!codes.contains(&checks::BLIT_SAMPLE_COUNT_MISMATCH), "{codes:?}");
    assert!(!codes.contains(&checks::INVALID_ATTACHMENT_FORMAT), "{codes:?}");
}

#[test]
fn disjoint_twin_lifetimes_yield_exactly_one_aliasing_hint() {
    let nodes: Vec<serde_json::Value> = (0..10)
        .map(|i| {
            let mut node = json!({ "nodeIndex": i });
            match i {
                0 => node["outputRenderTargetIndices"] = json!([0]),
                3 => node["inputRenderTargetIndices"] = json!([0]),
                5 => node["outputRenderTargetIndices"] = json!([1]),
                9 => node["inputRenderTargetIndices"] = json!([1]),
                _ => {}
            }
            node
        })
        .collect();
    let order: Vec<serde_json::Value> = (0..10).map(|i| json!([-1, i])).collect();

    let report = report_for(json!({
        "renderTargetDescriptions": [
            { "format": 37, "extent": [512, 512, 1], "usage": 20 },
            { "format": 37, "extent": [512, 512, 1], "usage": 20 },
        ],
        "nodeDataDescriptions": nodes,
        "graphOrder": order,
    }));

    let aliasing: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.code == checks::ALIASING_OPPORTUNITY)
        .collect();
    assert_eq!(aliasing.len(), 1, "issues: {:?}", codes_of(&report));
    assert_eq!(aliasing[0].severity, Severity::Info);
    assert_eq!(aliasing[0].details["render_targets"], json!([0, 1]));
}

#[test]
fn dangling_references_are_errors_but_sentinels_are_not() {
    let report = report_for(json!({
        "renderTargetDescriptions": [{ "format": 37, "usage": 4 }],
        "renderPassDescriptions": [{
            "nodeIndices": [0, 7],
            "colorAttachmentIndices": [3],
        }],
        "nodeDataDescriptions": [{
            "nodeIndex": 0,
            "inputRenderTargetIndices": [0, 9, 4294967295u32],
            "outputRenderTargetIndices": [0],
        }],
        "graphOrder": [[0, 0]],
    }));

    let missing_targets: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.code == checks::MISSING_RENDER_TARGET)
        .collect();
    // Pass attachment 3 and node input 9; the backbuffer sentinel is legal.
    assert_eq!(missing_targets.len(), 2, "issues: {:?}", codes_of(&report));
    assert!(codes_of(&report).contains(&checks::MISSING_NODE));
}

#[test]
fn blit_sample_count_downgrade_applies_to_msaa_resolves_only() {
    let report = report_for(json!({
        "renderTargetDescriptions": [
            { "format": 37, "sampleCount": 4, "usage": 5 },
            { "format": 37, "sampleCount": 1, "usage": 18 },
            { "format": 38, "sampleCount": 1, "usage": 5 },
            { "format": 37, "sampleCount": 4, "usage": 18 },
        ],
        "nodeDataDescriptions": [
            // MSAA -> 1x, same format: intentional resolve, warning.
            { "nodeIndex": 0, "type": 3,
              "inputRenderTargetIndices": [0], "outputRenderTargetIndices": [1] },
            // 1x -> MSAA: error.
            { "nodeIndex": 1, "type": 3,
              "inputRenderTargetIndices": [2], "outputRenderTargetIndices": [3] },
        ],
        "graphOrder": [[-1, 0], [-1, 1]],
    }));

    let mismatches: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.code == checks::BLIT_SAMPLE_COUNT_MISMATCH)
        .collect();
    assert_eq!(mismatches.len(), 2);
    assert_eq!(mismatches[0].severity, Severity::Warning);
    assert_eq!(mismatches[1].severity, Severity::Error);
    assert!(codes_of(&report).contains(&checks::BLIT_FORMAT_MISMATCH));
}

#[test]
fn mip_generation_ordering_is_enforced() {
    let report = report_for(json!({
        "renderTargetDescriptions": [
            { "name": "hdr_chain", "format": 37, "mipLevels": 5, "usage": 22 },
        ],
        "nodeDataDescriptions": [
            { "nodeIndex": 0, "outputRenderTargetIndices": [0] },
            { "nodeIndex": 1, "type": 6, "outputRenderTargetIndices": [0] },
            { "nodeIndex": 2, "outputRenderTargetIndices": [0] },
        ],
        "graphOrder": [[-1, 0], [-1, 1], [-1, 2]],
    }));

    let late_writes: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.code == checks::WRITE_AFTER_MIP_GENERATION)
        .collect();
    assert_eq!(late_writes.len(), 1, "issues: {:?}", codes_of(&report));
    assert_eq!(late_writes[0].details["writer"], json!(2));
    assert!(!codes_of(&report).contains(&checks::MISSING_MIP_GENERATION));
}

#[test]
fn binding_names_are_compared_against_target_names() {
    let report = report_for(json!({
        "renderTargetDescriptions": [
            { "name": "vs_normal_buffer", "format": 37, "usage": 4 },
            { "name": "velocity_rt", "format": 37, "usage": 4 },
        ],
        "nodeDataDescriptions": [
            { "nodeIndex": 0, "outputRenderTargetIndices": [0, 1] },
            { "nodeIndex": 1, "dataJson": {
                "ws_normal": 0x10000,   // concept matches, space differs
                "shadow_map": 0x10001,  // concept mismatch
            }},
        ],
        "graphOrder": [[-1, 0], [-1, 1]],
    }));

    let codes = codes_of(&report);
    assert!(codes.contains(&checks::SEMANTIC_MISMATCH), "{codes:?}");
    assert!(codes.contains(&checks::COORDINATE_SPACE_MISMATCH), "{codes:?}");

    for issue in &report.issues {
        match issue.code {
            checks::SEMANTIC_MISMATCH => {
                assert_eq!(issue.details["binding_key"], json!("shadow_map"));
                assert_eq!(issue.details["render_target"], json!(1));
            }
            checks::COORDINATE_SPACE_MISMATCH => {
                assert_eq!(issue.details["binding_key"], json!("ws_normal"));
            }
            _ => {}
        }
    }
}

#[test]
fn isolated_nodes_are_flagged_except_viewport() {
    let report = report_for(json!({
        "renderTargetDescriptions": [{}],
        "nodeDataDescriptions": [
            { "nodeIndex": 0, "name": "dangling" },
            { "nodeIndex": 1, "name": "vp", "type": 5 },
        ],
    }));

    let isolated: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.code == checks::ISOLATED_NODE)
        .collect();
    assert_eq!(isolated.len(), 1);
    assert_eq!(isolated[0].details["node"], json!(0));
}

#[test]
fn report_counts_match_issue_severities() {
    let report = report_for(json!({
        "renderTargetDescriptions": [{ "format": 37, "usage": 4 }],
        "renderPassDescriptions": [{ "name": "empty" }],
        "nodeDataDescriptions": [
            { "nodeIndex": 0, "inputRenderTargetIndices": [0] },
        ],
        "graphOrder": [[-1, 0]],
    }));

    assert_eq!(report.total_issues, report.issues.len());
    assert_eq!(
        report.errors,
        report.issues.iter().filter(|i| i.severity == Severity::Error).count()
    );
    assert_eq!(
        report.warnings,
        report.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    );
    assert_eq!(
        report.infos,
        report.issues.iter().filter(|i| i.severity == Severity::Info).count()
    );
    assert!(codes_of(&report).contains(&checks::EMPTY_RENDER_PASS));
}
