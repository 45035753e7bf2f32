//! ZIP archive creation

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Zip every file under `source_dir`, keeping paths relative to it
pub fn create_zip_from_directory(source_dir: &Path, zip_path: &Path) -> Result<()> {
    let file = File::create(zip_path)
        .with_context(|| format!("failed to create {}", zip_path.display()))?;
    let mut zip = ZipWriter::new(file);

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for entry in WalkDir::new(source_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() || path == zip_path {
            continue;
        }

        let relative_path = path
            .strip_prefix(source_dir)
            .context("Failed to get relative path")?;
        let name = relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        zip.start_file(name, options)?;
        let content = fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        zip.write_all(&content)?;
    }

    zip.finish()?;
    Ok(())
}
