#![doc = include_str!("../README.md")]

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

/// Migrate a JSON Schema document to draft 2020-12 in-place.
///
/// Applies all necessary keyword transformations for drafts 04 through 2019-09.
/// Safe to call on schemas that are already 2020-12 (idempotent).
pub fn migrate_to_2020_12(schema: &mut serde_json::Value) {
    // Pass 1: Set $schema at root
    if let Some(obj) = schema.as_object_mut() {
        obj.insert(
            "$schema".to_string(),
            serde_json::Value::String("https://json-schema.org/draft/2020-12/schema".to_string()),
        );
    }

    // Pass 2: Recursive keyword transformations
    migrate_keywords(schema);

    // Pass 3: Rewrite $ref paths (#/definitions/ → #/$defs/)
    rewrite_definition_refs(schema);
}

/// Recursively apply keyword transformations.
fn migrate_keywords(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            migrate_object_keywords(map);
            for v in map.values_mut() {
                migrate_keywords(v);
            }
        }
        serde_json::Value::Array(arr) => {
            for v in arr {
                migrate_keywords(v);
            }
        }
        _ => {}
    }
}

/// Apply all keyword transforms to a single JSON object.
fn migrate_object_keywords(map: &mut serde_json::Map<String, serde_json::Value>) {
    // definitions → $defs
    if map.contains_key("definitions")
        && !map.contains_key("$defs")
        && let Some(defs) = map.remove("definitions")
    {
        map.insert("$defs".to_string(), defs);
    }

    migrate_id(map);

    // Array items → prefixItems
    if let Some(items) = map.get("items")
        && items.is_array()
    {
        if let Some(items_val) = map.remove("items") {
            map.insert("prefixItems".to_string(), items_val);
        }
        if let Some(additional) = map.remove("additionalItems") {
            map.insert("items".to_string(), additional);
        }
    }

    // Boolean exclusiveMinimum/exclusiveMaximum (draft-04)
    migrate_exclusive_bound(map, "exclusiveMinimum", "minimum");
    migrate_exclusive_bound(map, "exclusiveMaximum", "maximum");

    // String "deprecated" → boolean true
    if let Some(dep) = map.get("deprecated")
        && dep.is_string()
    {
        map.insert("deprecated".to_string(), serde_json::Value::Bool(true));
    }

    // String "false"/"true" in schema-boolean positions
    migrate_string_booleans(map);

    // dependencies → dependentSchemas + dependentRequired
    migrate_dependencies(map);

    // Null annotation keywords → remove
    // Some generators emit "description": null, "title": null, etc.
    // The meta-schema requires these to be strings.
    for key in &["description", "title", "$comment"] {
        if let Some(v) = map.get(*key)
            && v.is_null()
        {
            map.remove(*key);
        }
    }

    // Normalize regex patterns for Rust regex_syntax compatibility
    if let Some(serde_json::Value::String(pat)) = map.get("pattern") {
        let norm = normalize_ecma_regex(pat);
        if norm != *pat {
            map.insert("pattern".to_string(), serde_json::Value::String(norm));
        }
    }
    if let Some(serde_json::Value::Object(pp)) = map.get("patternProperties") {
        let any_changed = pp.keys().any(|k| normalize_ecma_regex(k) != *k);
        if any_changed && let Some(serde_json::Value::Object(pp)) = map.remove("patternProperties")
        {
            let new_pp: serde_json::Map<String, serde_json::Value> = pp
                .into_iter()
                .map(|(k, v)| (normalize_ecma_regex(&k), v))
                .collect();
            map.insert(
                "patternProperties".to_string(),
                serde_json::Value::Object(new_pp),
            );
        }
    }
}

/// Migrate `id` → `$id` (draft-04) and remove fragment-only identifiers.
fn migrate_id(map: &mut serde_json::Map<String, serde_json::Value>) {
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
fn migrate_string_booleans(map: &mut serde_json::Map<String, serde_json::Value>) {
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
fn migrate_dependencies(map: &mut serde_json::Map<String, serde_json::Value>) {
    if !map.contains_key("dependencies") {
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

/// Normalize an ECMA 262 regex pattern for compatibility with Rust's `regex_syntax`.
///
/// Two incompatibilities are fixed:
///
/// 1. **Bare braces**: Unescaped `{` and `}` that do not form valid quantifiers
///    (`{n}`, `{n,}`, `{n,m}`) are escaped. ECMA 262 treats unmatched braces as
///    literals, but `regex_syntax` rejects them.
///
/// 2. **`\d` in character classes**: `\d` inside `[…]` is expanded to `0-9`.
///    This prevents `regex_syntax` from rejecting patterns where `\d` appears as
///    a range endpoint (e.g. `[\d-\.]`), and ensures ASCII-only digit matching
///    consistent with ECMA 262 semantics.
#[allow(clippy::missing_panics_doc)] // from_utf8 cannot panic on our output
pub fn normalize_ecma_regex(pattern: &str) -> String {
    let b = pattern.as_bytes();
    let valid_braces = find_valid_quantifier_braces(b);
    let mut out = Vec::with_capacity(b.len() + 16);
    let mut i = 0;
    let mut in_class = false;

    while i < b.len() {
        // Handle escape sequences
        if b[i] == b'\\' && i + 1 < b.len() {
            let next = b[i + 1];

            // Expand \d → 0-9 inside character classes
            if in_class && next == b'd' {
                out.extend_from_slice(b"0-9");
                i += 2;
                continue;
            }

            // Pass through Unicode escapes: \p{...}, \P{...}, \u{...}
            if matches!(next, b'p' | b'P' | b'u') && i + 2 < b.len() && b[i + 2] == b'{' {
                out.push(b'\\');
                out.push(next);
                i += 2;
                if let Some(close) = b[i..].iter().position(|&c| c == b'}') {
                    out.extend_from_slice(&b[i..=i + close]);
                    i += close + 1;
                }
                continue;
            }

            out.push(b[i]);
            out.push(next);
            i += 2;
            continue;
        }

        // Character class start
        if b[i] == b'[' && !in_class {
            in_class = true;
            out.push(b'[');
            i += 1;
            // Skip negation and literal ] at class start
            if i < b.len() && b[i] == b'^' {
                out.push(b'^');
                i += 1;
            }
            if i < b.len() && b[i] == b']' {
                out.push(b']');
                i += 1;
            }
            continue;
        }
        if b[i] == b']' && in_class {
            in_class = false;
            out.push(b']');
            i += 1;
            continue;
        }

        // Inside character class, everything is literal (no brace escaping needed)
        if in_class {
            out.push(b[i]);
            i += 1;
            continue;
        }

        // Escape bare braces outside character class
        if b[i] == b'{' && !valid_braces[i] {
            out.extend_from_slice(b"\\{");
            i += 1;
            continue;
        }
        if b[i] == b'}' && !valid_braces[i] {
            out.extend_from_slice(b"\\}");
            i += 1;
            continue;
        }

        out.push(b[i]);
        i += 1;
    }

    // Safety: input is valid UTF-8 and we only replace/insert ASCII bytes.
    // Non-ASCII bytes (≥ 128) never match our ASCII comparisons, so multi-byte
    // UTF-8 sequences pass through unchanged.
    String::from_utf8(out).expect("normalization preserves UTF-8")
}

/// Identify positions of `{` and `}` that form valid quantifiers.
fn find_valid_quantifier_braces(b: &[u8]) -> Vec<bool> {
    let mut valid = vec![false; b.len()];
    let mut i = 0;
    let mut in_class = false;

    while i < b.len() {
        if b[i] == b'\\' && i + 1 < b.len() {
            // Skip Unicode escapes: \p{...}, \P{...}, \u{...}
            if matches!(b[i + 1], b'p' | b'P' | b'u') && i + 2 < b.len() && b[i + 2] == b'{' {
                i += 2;
                if let Some(close) = b[i..].iter().position(|&c| c == b'}') {
                    i += close + 1;
                }
                continue;
            }
            i += 2;
            continue;
        }
        if b[i] == b'[' && !in_class {
            in_class = true;
            i += 1;
            continue;
        }
        if b[i] == b']' && in_class {
            in_class = false;
            i += 1;
            continue;
        }
        if b[i] == b'{'
            && !in_class
            && let Some(end) = parse_quantifier(b, i)
        {
            valid[i] = true;
            valid[end] = true;
            i = end + 1;
            continue;
        }
        i += 1;
    }

    valid
}

/// Check if `b[start]` (which must be `{`) begins a valid quantifier.
///
/// Returns the index of the closing `}` if valid, or `None` otherwise.
/// Valid forms: `{n}`, `{n,}`, `{n,m}` where n and m are non-negative integers.
fn parse_quantifier(b: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    // First number (required)
    let n_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i == n_start || i >= b.len() {
        return None;
    }
    if b[i] == b'}' {
        return Some(i); // {n}
    }
    if b[i] != b',' {
        return None;
    }
    i += 1; // skip comma
    if i >= b.len() {
        return None;
    }
    if b[i] == b'}' {
        return Some(i); // {n,}
    }
    // Second number
    let n_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    if i == n_start || i >= b.len() {
        return None;
    }
    if b[i] == b'}' {
        return Some(i); // {n,m}
    }
    None
}

/// Handle boolean `exclusiveMinimum`/`exclusiveMaximum` (draft-04).
///
/// - `true` + companion present: set exclusive = companion value, remove companion
/// - `false`: just remove exclusive
fn migrate_exclusive_bound(
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
fn rewrite_definition_refs(value: &mut serde_json::Value) {
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
