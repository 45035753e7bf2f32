//! Unpacked extension directory writer

use crate::models::{Manifest, CONTENT_SCRIPT_FILE};
use crate::transformer::manifest_to_json;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create `output_dir`, emptying it first when `clean` is set
pub fn prepare_output_dir(output_dir: &Path, clean: bool) -> Result<()> {
    if clean && output_dir.exists() {
        fs::remove_dir_all(output_dir)
            .with_context(|| format!("failed to clean {}", output_dir.display()))?;
        tracing::info!("Cleaned output directory");
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    Ok(())
}

pub fn write_manifest(output_dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let manifest_path = output_dir.join("manifest.json");
    let json = manifest_to_json(manifest)?;
    fs::write(&manifest_path, json)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;
    Ok(manifest_path)
}

pub fn write_content_script(output_dir: &Path, code: &str) -> Result<PathBuf> {
    let content_path = output_dir.join(CONTENT_SCRIPT_FILE);
    fs::write(&content_path, code)
        .with_context(|| format!("failed to write {}", content_path.display()))?;
    Ok(content_path)
}
