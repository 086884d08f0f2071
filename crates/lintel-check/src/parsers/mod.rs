mod json;
mod json5;
mod jsonc;
mod markdown;
mod toml_parser;
mod yaml;

use std::path::Path;

use serde_json::Value;

use crate::diagnostics::ParseDiagnostic;

pub use self::json::JsonParser;
pub use self::json5::Json5Parser;
pub use self::jsonc::JsoncParser;
pub use self::markdown::MarkdownParser;
pub use self::toml_parser::TomlParser;
pub use self::yaml::YamlParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Json5,
    Jsonc,
    Toml,
    Yaml,
    Markdown,
}

/// Parse file content into a `serde_json::Value`.
///
/// Implementations must produce a [`ParseDiagnostic`] with an accurate source
/// span when parsing fails.
pub trait Parser {
    /// # Errors
    ///
    /// Returns a [`ParseDiagnostic`] with an accurate source span when parsing fails.
    fn parse(&self, content: &str, file_name: &str) -> Result<Value, ParseDiagnostic>;

    /// Extract the `$schema` URI from file content and/or parsed value.
    ///
    /// The default implementation reads `value["$schema"]`, which works for
    /// JSON, JSON5, and JSONC. YAML and TOML override this to handle their
    /// format-specific conventions (modeline comments, etc.).
    fn extract_schema_uri(&self, _content: &str, value: &Value) -> Option<String> {
        value
            .get("$schema")
            .and_then(Value::as_str)
            .map(String::from)
    }
}

/// Detect file format from extension. Returns `None` for unrecognized extensions.
pub fn detect_format(path: &Path) -> Option<FileFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(FileFormat::Json),
        Some("yaml" | "yml") => Some(FileFormat::Yaml),
        Some("json5") => Some(FileFormat::Json5),
        Some("jsonc") => Some(FileFormat::Jsonc),
        Some("toml") => Some(FileFormat::Toml),
        Some("md" | "mdx") => Some(FileFormat::Markdown),
        _ => None,
    }
}

/// Return a boxed parser for the given format.
pub fn parser_for(format: FileFormat) -> Box<dyn Parser> {
    match format {
        FileFormat::Json => Box::new(JsonParser),
        FileFormat::Json5 => Box::new(Json5Parser),
        FileFormat::Jsonc => Box::new(JsoncParser),
        FileFormat::Toml => Box::new(TomlParser),
        FileFormat::Yaml => Box::new(YamlParser),
        FileFormat::Markdown => Box::new(MarkdownParser),
    }
}

/// Convert 1-based line and column to a byte offset in content.
pub fn line_col_to_offset(content: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;
    for (i, l) in content.lines().enumerate() {
        if i + 1 == line {
            return offset + col.saturating_sub(1);
        }
        offset += l.len() + 1; // +1 for newline
    }
    offset.min(content.len())
}
