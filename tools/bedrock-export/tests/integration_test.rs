//! Integration tests for bedrock-export
//!
//! Tests the full pipeline: write interchange geometry -> convert -> verify output

use std::path::Path;
use std::process::{Command, Output};

use bedrock_export::rig_common::Geometry;
use bedrock_export::{export_document, ExportOptions};
use serde_json::Value;
use tempfile::tempdir;

const RIG_JSON: &str = r#"{
    "id": "zombie",
    "bones": [
        {
            "name": "body",
            "pivot": [0, 24, 0],
            "cubes": [{ "origin": [-4, 12, -2], "size": [8, 12, 4], "uv": { "box": [16, 16] } }]
        },
        {
            "name": "head",
            "parent": 0,
            "pivot": [0, 24, 0],
            "cubes": [{
                "origin": [-4, 24, -4],
                "size": [8, 8, 8],
                "inflate": 0.5,
                "uv": { "per_face": {
                    "up": { "uv": [8, 0], "uv_size": [8, 8] },
                    "north": { "uv": [8, 8], "uv_size": [8, 8] }
                } }
            }]
        },
        {
            "name": "left_arm",
            "parent": 0,
            "pivot": [5, 22, 0],
            "rotation": [-90, 0, 0],
            "cubes": [{ "origin": [4, 12, -2], "size": [4, 12, 4], "mirror": true, "uv": { "box": [40, 16] } }]
        }
    ],
    "root_bone": 0
}"#;

const MESH_JSON: &str = r#"{
    "id": "plate",
    "meshes": [{
        "id": "plate/0",
        "name": "plate",
        "vertices": [0, 0, 0, 1, 0, 0, 1, 0, 1, 0, 0, 1],
        "uvs": [0, 0, 1, 0, 1, 0.75, 0, 0.75],
        "indices": [0, 2, 1, 0, 3, 2]
    }]
}"#;

/// Test rigged geometry -> .geo.json conversion
#[test]
fn test_rig_to_geo_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("zombie.json");
    let output = dir.path().join("zombie.geo.json");
    std::fs::write(&input, RIG_JSON).expect("Failed to write geometry");

    let result = run(&["export", path_str(&input), "-o", path_str(&output)]);
    assert!(result.status.success(), "export command failed");

    let document = read_document(&output);
    assert_eq!(document["format_version"], "1.12.0");

    let entry = &document["minecraft:geometry"][0];
    assert_eq!(entry["description"]["identifier"], "geometry.zombie");

    let bones = entry["bones"].as_array().expect("bones should be a list");
    assert_eq!(bones.len(), 3);
    assert!(bones[0].get("parent").is_none());
    assert_eq!(bones[1]["parent"], "body");
    assert_eq!(bones[2]["parent"], "body");
    assert!(bones[1].get("rotation").is_none());
    assert_eq!(bones[2]["rotation"], serde_json::json!([-90.0, 0.0, 0.0]));
    assert!(bones[0]["cubes"][0]["uv"].is_array());
    assert!(bones[1]["cubes"][0]["uv"].is_object());
    assert_eq!(bones[1]["cubes"][0]["inflate"], 0.5);
    assert_eq!(bones[2]["cubes"][0]["mirror"], true);
}

/// Test mesh-only geometry -> poly mesh, with the default output path
#[test]
fn test_mesh_to_poly_mesh() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("plate.json");
    std::fs::write(&input, MESH_JSON).expect("Failed to write geometry");

    let result = run(&["export", path_str(&input)]);
    assert!(result.status.success(), "export command failed");

    let output = dir.path().join("plate.geo.json");
    assert!(output.exists(), "Default output should sit next to the input");

    let document = read_document(&output);
    let bones = document["minecraft:geometry"][0]["bones"]
        .as_array()
        .expect("bones should be a list");
    assert_eq!(bones.len(), 1);

    let poly_mesh = &bones[0]["poly_mesh"];
    assert_eq!(poly_mesh["normalized_uvs"], true);
    assert_eq!(poly_mesh["positions"].as_array().map(Vec::len), Some(4));
    assert_eq!(poly_mesh["normals"].as_array().map(Vec::len), Some(4));
    assert_eq!(poly_mesh["normals"][0], serde_json::json!([0.0, 1.0, 0.0]));
    assert_eq!(poly_mesh["uvs"][2], serde_json::json!([1.0, 0.75]));
    assert_eq!(
        poly_mesh["polys"][1],
        serde_json::json!([[0, 0, 0], [3, 3, 3], [2, 2, 2]])
    );
}

/// Test options file plus command-line overrides
#[test]
fn test_config_and_overrides() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("plate.json");
    let config = dir.path().join("export.toml");
    let output = dir.path().join("out.geo.json");
    std::fs::write(&input, MESH_JSON).expect("Failed to write geometry");
    std::fs::write(
        &config,
        "identifier = \"geometry.from_config\"\ntexture_width = 128\ngenerate_normals = false\n",
    )
    .expect("Failed to write config");

    let result = run(&[
        "export",
        path_str(&input),
        "-o",
        path_str(&output),
        "-c",
        path_str(&config),
        "--identifier",
        "geometry.from_cli",
        "--flip-uvs",
    ]);
    assert!(result.status.success(), "export command failed");

    let document = read_document(&output);
    let entry = &document["minecraft:geometry"][0];
    assert_eq!(entry["description"]["identifier"], "geometry.from_cli");
    assert_eq!(entry["description"]["texture_width"], 128);

    let poly_mesh = &entry["bones"][0]["poly_mesh"];
    assert!(poly_mesh.get("normals").is_none());
    assert_eq!(poly_mesh["uvs"][0], serde_json::json!([0.0, 1.0]));
    assert_eq!(poly_mesh["uvs"][2], serde_json::json!([1.0, 0.25]));
}

/// The written file holds exactly the library's document
#[test]
fn test_output_matches_library_document() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("zombie.json");
    let output = dir.path().join("zombie.geo.json");
    std::fs::write(&input, RIG_JSON).expect("Failed to write geometry");

    let result = run(&["export", path_str(&input), "-o", path_str(&output)]);
    assert!(result.status.success(), "export command failed");

    let geometry: Geometry = serde_json::from_str(RIG_JSON).expect("Fixture should be valid");
    let expected = export_document(&geometry, &ExportOptions::default());
    assert_eq!(read_document(&output), expected);
}

#[test]
fn test_check_command() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("zombie.json");
    std::fs::write(&input, RIG_JSON).expect("Failed to write geometry");

    let result = run(&["check", path_str(&input)]);
    assert!(result.status.success(), "check command failed");
}

#[test]
fn test_invalid_geometry_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("broken.json");
    let output = dir.path().join("broken.geo.json");
    std::fs::write(
        &input,
        r#"{"id":"broken","meshes":[{"id":"m","name":"m","vertices":[0,0,0],"indices":[0,1,2]}]}"#,
    )
    .expect("Failed to write geometry");

    let result = run(&["export", path_str(&input), "-o", path_str(&output)]);
    assert!(!result.status.success(), "Out-of-range indices should fail");
    assert!(!output.exists(), "No output should be written on failure");

    let result = run(&["check", path_str(&input)]);
    assert!(!result.status.success(), "check should reject the geometry");
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let input = dir.path().join("plate.json");
    let config = dir.path().join("export.toml");
    std::fs::write(&input, MESH_JSON).expect("Failed to write geometry");
    std::fs::write(&config, "scale = 0.0\n").expect("Failed to write config");

    let result = run(&["export", path_str(&input), "-c", path_str(&config)]);
    assert!(!result.status.success(), "Zero scale should be rejected");
}

// Helper to run bedrock-export
fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bedrock-export"))
        .args(args)
        .output()
        .expect("Failed to run bedrock-export")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("Temp path should be UTF-8")
}

fn read_document(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("Failed to read output");
    assert!(text.ends_with('\n'), "Output should end with a newline");
    serde_json::from_str(&text).expect("Output should be valid JSON")
}
