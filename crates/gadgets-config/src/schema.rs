use schemars::schema::{RootSchema, Schema};
use schemars::schema_for;
use serde_json::json;

use crate::GadgetsConfig;

/// JSON schema for `gadgets.toml`.
///
/// Intended for editor tooling (TOML JSON schema integration) and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    let mut schema = schema_for!(GadgetsConfig);
    apply_semantic_constraints(&mut schema);
    schema
}

fn apply_semantic_constraints(schema: &mut RootSchema) {
    // Empty class filter patterns are ignored at runtime; flag them in editors instead.
    let Some(Schema::Object(filter)) = schema.definitions.get_mut("ClassFilter") else {
        return;
    };
    let Some(object) = filter.object.as_mut() else {
        return;
    };
    if let Some(Schema::Object(pattern)) = object.properties.get_mut("pattern") {
        pattern.string().min_length = Some(1);
    }
    filter.extensions.insert(
        "examples".to_string(),
        json!([{ "pattern": "java.lang.*" }, { "pattern": "*Test", "enabled": false }]),
    );
}
