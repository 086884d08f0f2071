use core::fmt::Write;

use serde_json::Value;

use crate::PrettierOptions;
use crate::printer::Doc;

/// Convert a JSON value to a document IR.
pub fn json_to_doc(value: &Value, options: &PrettierOptions) -> Doc {
    value_to_doc(value, options)
}

fn value_to_doc(value: &Value, options: &PrettierOptions) -> Doc {
    match value {
        Value::Null => Doc::text("null"),
        Value::Bool(b) => Doc::text(if *b { "true" } else { "false" }),
        Value::Number(n) => Doc::text(n.to_string()),
        Value::String(s) => Doc::text(format!("\"{}\"", escape_json_string(s))),
        Value::Array(arr) => array_to_doc(arr, options),
        Value::Object(obj) => object_to_doc(obj, options),
    }
}

fn array_to_doc(arr: &[Value], options: &PrettierOptions) -> Doc {
    if arr.is_empty() {
        return Doc::text("[]");
    }

    let mut items = Vec::new();
    for (i, val) in arr.iter().enumerate() {
        if i > 0 {
            items.push(Doc::text(","));
            items.push(Doc::Line);
        }
        items.push(value_to_doc(val, options));
    }

    Doc::group(Doc::concat(vec![
        Doc::text("["),
        Doc::indent(Doc::concat(
            core::iter::once(Doc::Softline).chain(items).collect(),
        )),
        Doc::Softline,
        Doc::text("]"),
    ]))
}

fn object_to_doc(obj: &serde_json::Map<String, Value>, options: &PrettierOptions) -> Doc {
    if obj.is_empty() {
        return Doc::text("{}");
    }

    let (open, close) = if options.bracket_spacing {
        (Doc::Line, Doc::Line)
    } else {
        (Doc::Softline, Doc::Softline)
    };

    let mut items = Vec::new();
    for (i, (key, val)) in obj.iter().enumerate() {
        if i > 0 {
            items.push(Doc::text(","));
            items.push(Doc::Line);
        }
        items.push(Doc::concat(vec![
            Doc::text(format!("\"{}\"", escape_json_string(key))),
            Doc::text(": "),
            value_to_doc(val, options),
        ]));
    }

    let inner = Doc::concat(core::iter::once(open).chain(items).collect());

    Doc::group(Doc::concat(vec![
        Doc::text("{"),
        Doc::indent(inner),
        close,
        Doc::text("}"),
    ]))
}

fn escape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\u{08}' => result.push_str("\\b"),
            '\u{0C}' => result.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    result
}
