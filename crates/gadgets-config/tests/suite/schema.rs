use gadgets_config::json_schema;

#[test]
fn schema_describes_inspection_settings() {
    let schema = serde_json::to_value(json_schema()).expect("schema serializes");

    let filter = &schema["definitions"]["ClassFilter"];
    assert_eq!(filter["properties"]["pattern"]["minLength"], 1);
    assert!(filter["examples"].is_array());

    let policy = serde_json::to_string(&schema["definitions"]["ExtensibilityPolicy"]).unwrap();
    for variant in ["open_world", "sealed", "closed_world"] {
        assert!(policy.contains(variant), "{policy}");
    }
}
