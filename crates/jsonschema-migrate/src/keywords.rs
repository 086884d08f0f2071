/// Schema keywords used to distinguish schema-like objects from data properties.
const SCHEMA_KEYWORDS: &[&str] = &[
    "type",
    "properties",
    "$ref",
    "allOf",
    "oneOf",
    "anyOf",
    "definitions",
    "$defs",
    "items",
    "required",
    "enum",
    "not",
    "if",
    "then",
    "else",
    "patternProperties",
    "additionalProperties",
];

/// Migrate `id` → `$id` (draft-04) and remove fragment-only identifiers.
pub(crate) fn migrate_id(map: &mut serde_json::Map<String, serde_json::Value>) {
    // id → $id (only non-fragment, schema-like objects)
    if !map.contains_key("$id")
        && let Some(serde_json::Value::String(id_str)) = map.get("id")
        && !id_str.starts_with('#')
    {
        let looks_like_schema = SCHEMA_KEYWORDS.iter().any(|kw| map.contains_key(*kw));
        if looks_like_schema && let Some(id_val) = map.remove("id") {
            map.insert("$id".to_string(), id_val);
        }
    }
    // Remove fragment-only id values
    if let Some(serde_json::Value::String(id_str)) = map.get("id")
        && id_str.starts_with('#')
    {
        map.remove("id");
    }
    // Remove fragment-only $id values (invalid in 2020-12)
    if let Some(serde_json::Value::String(id_str)) = map.get("$id")
        && id_str.starts_with('#')
    {
        map.remove("$id");
    }
}

/// Fix string `"false"`/`"true"` in positions that require boolean or schema.
pub(crate) fn migrate_string_booleans(map: &mut serde_json::Map<String, serde_json::Value>) {
    for key in &[
        "additionalProperties",
        "additionalItems",
        "unevaluatedProperties",
        "unevaluatedItems",
    ] {
        if let Some(serde_json::Value::String(s)) = map.get(*key) {
            let replacement = match s.as_str() {
                "false" => Some(false),
                "true" => Some(true),
                _ => None,
            };
            if let Some(b) = replacement {
                map.insert((*key).to_string(), serde_json::Value::Bool(b));
            }
        }
    }
}

/// Split `dependencies` into `dependentSchemas` + `dependentRequired`.
///
/// Only applies when the containing object looks like a schema (has schema keywords),
/// to avoid transforming property definitions named "dependencies"
/// (e.g. Cargo.toml's `[dependencies]` section inside a `properties` map).
pub(crate) fn migrate_dependencies(map: &mut serde_json::Map<String, serde_json::Value>) {
    if !map.contains_key("dependencies") {
        return;
    }
    let looks_like_schema = SCHEMA_KEYWORDS.iter().any(|kw| map.contains_key(*kw));
    if !looks_like_schema {
        return;
    }
    let Some(serde_json::Value::Object(deps)) = map.remove("dependencies") else {
        return;
    };
    let mut schemas = serde_json::Map::new();
    let mut required = serde_json::Map::new();
    for (key, val) in deps {
        if val.is_array() {
            required.insert(key, val);
        } else {
            schemas.insert(key, val);
        }
    }
    if !schemas.is_empty() && !map.contains_key("dependentSchemas") {
        map.insert(
            "dependentSchemas".to_string(),
            serde_json::Value::Object(schemas),
        );
    }
    if !required.is_empty() && !map.contains_key("dependentRequired") {
        map.insert(
            "dependentRequired".to_string(),
            serde_json::Value::Object(required),
        );
    }
}

/// Handle boolean `exclusiveMinimum`/`exclusiveMaximum` (draft-04).
///
/// - `true` + companion present: set exclusive = companion value, remove companion
/// - `false`: just remove exclusive
pub(crate) fn migrate_exclusive_bound(
    map: &mut serde_json::Map<String, serde_json::Value>,
    exclusive_key: &str,
    companion_key: &str,
) {
    if let Some(serde_json::Value::Bool(b)) = map.get(exclusive_key) {
        let b = *b;
        if b {
            if let Some(companion) = map.get(companion_key).cloned() {
                map.insert(exclusive_key.to_string(), companion);
                map.remove(companion_key);
            } else {
                map.remove(exclusive_key);
            }
        } else {
            map.remove(exclusive_key);
        }
    }
}

/// Rewrite `#/definitions/` → `#/$defs/` in `$ref` and `$id` strings.
pub(crate) fn rewrite_definition_refs(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for key in &["$ref", "$id"] {
                if let Some(serde_json::Value::String(s)) = map.get(*key) {
                    let new_s = s.replace("#/definitions/", "#/$defs/");
                    if new_s != *s {
                        map.insert((*key).to_string(), serde_json::Value::String(new_s));
                    }
                }
            }
            for v in map.values_mut() {
                rewrite_definition_refs(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for v in arr {
                rewrite_definition_refs(v);
            }
        }
        _ => {}
    }
}
