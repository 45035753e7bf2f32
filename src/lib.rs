//! Userscript to Browser Extension Converter
//!
//! A library for turning Tampermonkey/GreaseMonkey userscripts into Manifest V3
//! extensions. Handles metadata parsing, manifest generation, GM API polyfills
//! and Chrome Web Store readiness checks.

pub mod error;
pub mod fetcher;
pub mod models;
pub mod packager;
pub mod parser;
pub mod report;
pub mod transformer;
pub mod utils;
pub mod validator;

pub use error::{BuildError, BuildResult};
pub use models::{BuildOptions, BuildOutcome, Manifest, UserScriptMetadata};
pub use report::{Reporter, TracingReporter};

use anyhow::{Context, Result};
use fetcher::{HttpFetcher, LibraryFetcher};
use models::{ICONS_DIR, LIB_DIR, OUTPUT_DIR_NAME};
use std::fs;
use std::path::Path;
use transformer::{map_permissions, ManifestBuilder, PolyfillInjector};

/// Build the userscript in `script_dir` into `script_dir/extension/`
pub fn build_script(
    script_dir: &Path,
    options: &BuildOptions,
    reporter: &dyn Reporter,
) -> Result<BuildOutcome> {
    build_script_with(script_dir, options, reporter, &HttpFetcher)
}

/// [`build_script`] with a caller-supplied library fetcher
pub fn build_script_with(
    script_dir: &Path,
    options: &BuildOptions,
    reporter: &dyn Reporter,
    fetcher: &dyn LibraryFetcher,
) -> Result<BuildOutcome> {
    // 1. Locate and parse the script
    let script_path = utils::find_script_file(script_dir)?;
    reporter.info(&format!("Found script: {}", script_path.display()));

    let source = fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read {}", script_path.display()))?;
    let metadata = parser::parse_metadata(&source)?;
    reporter.info(&format!("Parsed: {} v{}", metadata.name, metadata.version));

    // 2. Store checks, before anything is written
    validator::validate_store_readiness(&metadata, reporter)?;
    let assets = validator::validate_store_assets(script_dir, reporter)?;
    reporter.info(&format!(
        "Validated store assets: {} screenshot(s)",
        assets.screenshots.len()
    ));

    let output_dir = script_dir.join(OUTPUT_DIR_NAME);
    packager::prepare_output_dir(&output_dir, options.clean)?;

    // 3. Libraries, icons, manifest, content script
    let lib_files = if metadata.require_urls.is_empty() {
        Vec::new()
    } else {
        fetcher.fetch_libraries(&metadata.require_urls, &output_dir.join(LIB_DIR))?
    };

    utils::generate_icon_sizes(&assets.icon, &output_dir.join(ICONS_DIR))?;
    reporter.info("Generated icons: 16x16, 48x48, 128x128");

    let permissions = map_permissions(&metadata);
    let manifest = ManifestBuilder::new(&metadata, &permissions, &lib_files, true).build();
    let manifest_path = packager::write_manifest(&output_dir, &manifest)?;
    reporter.info(&format!("Generated: {}", manifest_path.display()));

    let code_body = parser::extract_code_body(&source);
    let code = PolyfillInjector::new(&metadata).inject(&code_body, reporter);
    let content_path = packager::write_content_script(&output_dir, &code)?;
    reporter.info(&format!("Generated: {}", content_path.display()));

    reporter.info(&format!("Extension built: {}", output_dir.display()));

    // 4. Optional packaging
    let archive = if options.package {
        Some(package(script_dir, &script_path, &output_dir, options, reporter)?)
    } else {
        None
    };

    Ok(BuildOutcome {
        script_path,
        output_dir,
        manifest,
        lib_files,
        screenshot_count: assets.screenshots.len(),
        archive,
    })
}

fn package(
    script_dir: &Path,
    script_path: &Path,
    output_dir: &Path,
    options: &BuildOptions,
    reporter: &dyn Reporter,
) -> Result<std::path::PathBuf> {
    let config = packager::load_upload_config(script_dir);
    match &config {
        None => reporter.warn(
            "No upload_config.json found in store_assets/. \
             Packaging with default settings and skipping upload pages.",
        ),
        Some(c) if c.upload_urls.is_none() => reporter.warn(
            "upload_config.json has no 'upload_urls' field. Skipping upload pages.",
        ),
        Some(_) => {}
    }

    let script_filename = script_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let zip_path = packager::package_extension(
        output_dir,
        &script_filename,
        config.as_ref(),
        script_dir,
        options.downloads_dir.as_deref(),
    )?;

    if let Some(config) = config.as_ref().filter(|c| c.upload_urls.is_some()) {
        packager::open_upload_pages(config);
    }

    Ok(zip_path)
}
