//! Writes the compiled catalog to disk.

use crate::record::Catalog;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Serialize `catalog` as indented JSON to `path`, creating parent
/// directories. Existing content is overwritten.
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(catalog).context("serializing catalog")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "catalog written");
    Ok(())
}
