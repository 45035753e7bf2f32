//! Icon generation from a single source image

use crate::error::{BuildError, BuildResult};
use crate::models::IconSet;
use image::imageops::FilterType;
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Render `icon16.png`, `icon48.png` and `icon128.png` into `output_dir`
pub fn generate_icon_sizes(source: &Path, output_dir: &Path) -> BuildResult<Vec<PathBuf>> {
    resize_icon(source, output_dir, &IconSet::SIZES)
}

pub fn resize_icon(source: &Path, output_dir: &Path, sizes: &[u32]) -> BuildResult<Vec<PathBuf>> {
    if !source.is_file() {
        return Err(BuildError::Generation(format!(
            "icon source file not found: {}",
            source.display()
        )));
    }

    let img = image::open(source).map_err(|e| {
        BuildError::Generation(format!("cannot read {}: {}", source.display(), e))
    })?;

    fs::create_dir_all(output_dir).map_err(|e| BuildError::io(output_dir, e))?;

    let mut written = Vec::with_capacity(sizes.len());
    for &size in sizes {
        let output_path = output_dir.join(IconSet::file_name(size));
        img.resize_exact(size, size, FilterType::Lanczos3)
            .save_with_format(&output_path, ImageFormat::Png)
            .map_err(|e| {
                BuildError::Generation(format!("cannot write {}: {}", output_path.display(), e))
            })?;
        tracing::debug!("Generated: {}", output_path.display());
        written.push(output_path);
    }

    Ok(written)
}
