#![doc = include_str!("../README.md")]

extern crate alloc;

use alloc::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A JSON Schema catalog following the `SchemaStore` catalog format.
/// See: <https://json.schemastore.org/schema-catalog.json>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub schemas: Vec<SchemaEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<CatalogGroup>,
}

/// A group of related schemas in the catalog.
///
/// Groups provide richer metadata for catalog consumers that support them.
/// Consumers that don't understand `groups` simply ignore the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogGroup {
    pub name: String,
    pub description: String,
    /// Schema names that belong to this group.
    pub schemas: Vec<String>,
}

/// A single schema entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(default, rename = "fileMatch", skip_serializing_if = "Vec::is_empty")]
    pub file_match: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub versions: BTreeMap<String, String>,
}

/// Parse a catalog from a JSON string.
///
/// # Errors
///
/// Returns an error if the string is not valid JSON or does not match the catalog schema.
pub fn parse_catalog(json: &str) -> Result<Catalog, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a catalog from a `serde_json::Value`.
///
/// # Errors
///
/// Returns an error if the value does not match the expected catalog schema.
pub fn parse_catalog_value(value: serde_json::Value) -> Result<Catalog, serde_json::Error> {
    serde_json::from_value(value)
}
