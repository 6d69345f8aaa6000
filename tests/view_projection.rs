use render_graph_analyzer::{analyze_graph, load_graph_from_str};
use serde_json::json;

fn sample_graph() -> serde_json::Value {
    json!({
        "renderTargetDescriptions": [
            { "name": "gbuffer_albedo", "format": 37, "usage": 20 },
            { "name": "scene_depth", "format": 126, "usage": 36, "aspect": 2 },
            { "name": "unused_scratch", "format": 37 },
        ],
        "renderPassDescriptions": [{
            "name": "gbuffer",
            "nodeIndices": [1],
            "colorAttachmentIndices": [0],
            "depthAttachmentIndex": 1,
        }],
        "nodeDataDescriptions": [
            { "nodeIndex": 1, "name": "draw_geometry" },
            { "nodeIndex": 2, "name": "lighting",
              "inputRenderTargetIndices": [0, 4294967295u32],
              "conditions": ["deferred"] },
            { "nodeIndex": 5, "name": "never_scheduled", "inputRenderTargetIndices": [0] },
        ],
        "graphOrder": [[0, 1], [-1, 2]],
    })
}

#[test]
fn projection_orderings_and_field_names_are_stable() {
    let raw = load_graph_from_str(&sample_graph().to_string()).unwrap();
    let analysis = analyze_graph(&raw).unwrap();
    let view = serde_json::to_value(analysis.view()).unwrap();

    assert_eq!(view["summary"]["total_render_targets"], json!(3));
    assert_eq!(view["summary"]["total_nodes"], json!(3));
    assert_eq!(view["summary"]["total_render_passes"], json!(1));

    // Reached nodes first, in execution order; unreached trail with -1.
    let nodes = view["nodes_by_execution_order"].as_array().unwrap();
    let names: Vec<&str> = nodes.iter().map(|n| n["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["draw_geometry", "lighting", "never_scheduled"]);
    assert_eq!(nodes[0]["execution_order"], json!(0));
    assert_eq!(nodes[0]["type"], json!("draw"));
    assert_eq!(nodes[0]["render_pass"], json!("gbuffer"));
    assert_eq!(nodes[2]["execution_order"], json!(-1));

    // The backbuffer sentinel resolves to its engine name.
    let lighting_inputs = nodes[1]["inputs"].as_array().unwrap();
    assert_eq!(lighting_inputs[0]["name"], json!("gbuffer_albedo"));
    assert_eq!(lighting_inputs[1]["name"], json!("backbuffer"));

    // Targets with a first use lead, sorted by that use; unused trail.
    let targets = view["render_targets_by_first_usage"].as_array().unwrap();
    let target_names: Vec<&str> = targets
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        target_names,
        vec!["gbuffer_albedo", "scene_depth", "unused_scratch"]
    );

    let albedo = &targets[0];
    assert_eq!(albedo["lifetime"]["first_execution_order"], json!(0));
    assert_eq!(albedo["lifetime"]["last_execution_order"], json!(1));
    let writers = albedo["writers"].as_array().unwrap();
    assert_eq!(writers.len(), 1);
    // The attachment record outranks any generic relationship for display.
    assert_eq!(writers[0]["relationship"], json!("color_attachment"));
    let readers = albedo["readers"].as_array().unwrap();
    let reader_names: Vec<&str> = readers
        .iter()
        .map(|r| r["node_name"].as_str().unwrap())
        .collect();
    assert_eq!(reader_names, vec!["lighting", "never_scheduled"]);
    assert_eq!(readers[1]["execution_order"], json!(-1));

    let unused = &targets[2];
    assert_eq!(unused["lifetime"]["first_used_at_node"], json!(null));
    assert_eq!(unused["lifetime"]["last_used_at_node"], json!(null));

    let passes = view["render_passes"].as_array().unwrap();
    assert_eq!(passes[0]["name"], json!("gbuffer"));
    assert_eq!(passes[0]["depth_attachment_index"], json!(1));
}

#[test]
fn full_reanalysis_is_byte_for_byte_idempotent() {
    let raw = load_graph_from_str(&sample_graph().to_string()).unwrap();

    let first = serde_json::to_string(&analyze_graph(&raw).unwrap().view()).unwrap();
    let second = serde_json::to_string(&analyze_graph(&raw).unwrap().view()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn no_node_is_both_reader_and_writer_of_one_target() {
    // Explicit input plus shader write-binding on the same pair: the view
    // must show the node on exactly one side.
    let raw = load_graph_from_str(
        &json!({
            "renderTargetDescriptions": [{ "name": "ping", "format": 37, "usage": 12 }],
            "nodeDataDescriptions": [{
                "nodeIndex": 0,
                "name": "fxaa",
                "inputRenderTargetIndices": [0],
                "dataJson": { "ping": 0x20000 },
            }],
            "graphOrder": [[-1, 0]],
        })
        .to_string(),
    )
    .unwrap();
    let analysis = analyze_graph(&raw).unwrap();
    let view = serde_json::to_value(analysis.view()).unwrap();

    let target = &view["render_targets_by_first_usage"][0];
    let writers = target["writers"].as_array().unwrap();
    let readers = target["readers"].as_array().unwrap();
    assert_eq!(writers.len(), 1);
    assert!(readers.is_empty());
}
