//! Integration test that writes the result-record JSON Schema
//!
//! Run with: cargo test -p swaggerdrill-core --test generate_schema

use swaggerdrill_core::record::generate_schema;

#[test]
fn write_schema_file() {
    let schema = generate_schema();

    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("test-result.schema.json");

    std::fs::write(&schema_path, &schema).expect("failed to write schema file");

    // Verify the file is valid JSON
    let content = std::fs::read_to_string(&schema_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        parsed.get("title").and_then(|v| v.as_str()),
        Some("TestResult")
    );
    let props = parsed["properties"].as_object().unwrap();
    for key in ["endpoint", "status", "statusText", "requestBody", "duration"] {
        assert!(props.contains_key(key), "missing {key}");
    }
}
