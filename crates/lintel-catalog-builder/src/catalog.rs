use std::path::Path;

use anyhow::{Context, Result};
use schema_catalog::{Catalog, SchemaEntry};

/// Build an output catalog from a list of schema entries and optional groups.
pub fn build_output_catalog(
    title: Option<String>,
    entries: Vec<SchemaEntry>,
    groups: Vec<schema_catalog::CatalogGroup>,
) -> Catalog {
    Catalog {
        version: 1,
        title,
        schemas: entries,
        groups,
        ..Catalog::default()
    }
}

/// Write the catalog to `catalog.json` in the given directory.
///
/// Pretty-prints the JSON. The custom `Serialize` impl on [`Catalog`]
/// handles `$schema` injection and key ordering automatically.
pub async fn write_catalog_json(output_dir: &Path, catalog: &Catalog) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog).context("failed to serialize catalog")?;
    let catalog_path = output_dir.join("catalog.json");
    tokio::fs::write(&catalog_path, format!("{json}\n"))
        .await
        .with_context(|| format!("failed to write {}", catalog_path.display()))?;
    Ok(())
}
