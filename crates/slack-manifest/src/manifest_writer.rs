//! Manifest writer utilities
//!
//! The exported manifest is persisted as pretty-printed JSON, which is the
//! artifact the deployment tooling picks up.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::types::ManifestSchema;

/// Write a manifest as JSON, creating parent directories as needed
pub fn write_to_path(manifest: &ManifestSchema, output_path: &Path) -> Result<()> {
    debug!("Writing manifest to: {:?}", output_path);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json_string = serde_json::to_string_pretty(manifest)?;
    fs::write(output_path, &json_string)?;

    info!("Manifest written successfully to: {:?}", output_path);
    info!("Total functions: {}", manifest.functions.len());

    Ok(())
}

/// Read a previously written manifest
pub fn read_from_path(manifest_path: &Path) -> Result<ManifestSchema> {
    debug!("Reading manifest from: {:?}", manifest_path);

    let content = fs::read_to_string(manifest_path)?;
    let manifest: ManifestSchema = serde_json::from_str(&content)?;

    info!("Manifest loaded successfully");
    info!("App name: {}", manifest.display_information.name);
    info!("Total functions: {}", manifest.functions.len());

    Ok(manifest)
}
