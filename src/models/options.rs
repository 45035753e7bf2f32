//! Build options and results

use super::Manifest;
use std::path::PathBuf;

/// Directory created next to the script to hold the unpacked extension
pub const OUTPUT_DIR_NAME: &str = "extension";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Empty the output directory before building
    pub clean: bool,
    /// Zip the output and open the configured upload pages
    pub package: bool,
    /// Where packaged archives and listing images are also copied
    pub downloads_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub script_path: PathBuf,
    pub output_dir: PathBuf,
    pub manifest: Manifest,
    pub lib_files: Vec<String>,
    pub screenshot_count: usize,
    pub archive: Option<PathBuf>,
}
