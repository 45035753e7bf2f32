//! Packaging for store upload
//!
//! `store_assets/upload_config.json` (JSON5, comments allowed) controls the
//! archive name, where it is written and which dashboard pages to open:
//!
//! ```json5
//! {
//!   zip_filename: "dark-reader-lite",
//!   output_path: "~/releases",
//!   upload_urls: [
//!     "https://chrome.google.com/webstore/devconsole",
//!     { name: "Edge", url: "https://partner.microsoft.com/dashboard" },
//!   ],
//! }
//! ```

use super::archive::create_zip_from_directory;
use crate::utils::icons::resize_icon;
use crate::utils::script_base_name;
use crate::validator::assets::{store_assets_dir, ICON_FILE, SCREENSHOTS_DIR};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const UPLOAD_CONFIG_FILE: &str = "upload_config.json";
const ASSET_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadConfig {
    #[serde(default)]
    pub zip_filename: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub upload_urls: Option<Vec<UploadUrl>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UploadUrl {
    Plain(String),
    Entry {
        url: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl UploadUrl {
    pub fn url(&self) -> &str {
        match self {
            UploadUrl::Plain(url) => url,
            UploadUrl::Entry { url, .. } => url,
        }
    }
}

/// Load the upload config; a missing or malformed file yields `None`
pub fn load_upload_config(script_dir: &Path) -> Option<UploadConfig> {
    let config_path = store_assets_dir(script_dir).join(UPLOAD_CONFIG_FILE);
    let content = fs::read_to_string(&config_path).ok()?;

    match json5::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::error!("Failed to parse {}: {}", UPLOAD_CONFIG_FILE, e);
            None
        }
    }
}

/// Archive name without extension: configured name, else the script's base name
pub fn zip_name(script_filename: &str, config: Option<&UploadConfig>) -> String {
    config
        .and_then(|c| c.zip_filename.clone())
        .unwrap_or_else(|| script_base_name(script_filename).to_string())
}

/// Directory the archive is written to; relative paths are resolved against
/// `script_dir`, a leading `~` against the home directory.
pub fn resolve_output_path(script_dir: &Path, config: Option<&UploadConfig>) -> PathBuf {
    let Some(raw) = config.and_then(|c| c.output_path.as_deref()) else {
        return script_dir.to_path_buf();
    };

    let path = match raw.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches(&['/', '\\'][..])),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    };

    if path.is_absolute() {
        path
    } else {
        script_dir.join(path)
    }
}

/// The user's download folder
pub fn default_downloads_dir() -> Option<PathBuf> {
    dirs::download_dir().or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
}

/// Zip `extension_dir`. When `downloads_dir` is given and differs from the
/// output location, the archive and the store images are copied there too.
pub fn package_extension(
    extension_dir: &Path,
    script_filename: &str,
    config: Option<&UploadConfig>,
    script_dir: &Path,
    downloads_dir: Option<&Path>,
) -> Result<PathBuf> {
    let zip_filename = format!("{}.zip", zip_name(script_filename, config));
    let output_path = resolve_output_path(script_dir, config);
    fs::create_dir_all(&output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;

    let zip_path = output_path.join(&zip_filename);
    if zip_path.exists() {
        fs::remove_file(&zip_path)
            .with_context(|| format!("failed to remove {}", zip_path.display()))?;
        tracing::debug!("Removed existing ZIP file: {}", zip_path.display());
    }

    create_zip_from_directory(extension_dir, &zip_path)?;
    let size = fs::metadata(&zip_path).map(|m| m.len()).unwrap_or(0);
    tracing::info!("Packaged: {} ({} bytes)", zip_path.display(), size);

    if let Some(downloads) = downloads_dir.filter(|d| !same_dir(d, &output_path)) {
        fs::create_dir_all(downloads)
            .with_context(|| format!("failed to create {}", downloads.display()))?;
        let copied = downloads.join(&zip_filename);
        fs::copy(&zip_path, &copied)
            .with_context(|| format!("failed to copy archive to {}", copied.display()))?;
        tracing::info!("Copied ZIP to Downloads: {}", copied.display());

        copy_store_assets(script_dir, &zip_filename, downloads)?;
    }

    Ok(zip_path)
}

/// Copy listing images to `<downloads>/<zip name>_assets/`; `icon.png` becomes
/// a 128px `icon128.png`.
fn copy_store_assets(script_dir: &Path, zip_filename: &str, downloads: &Path) -> Result<usize> {
    let assets_dir = store_assets_dir(script_dir);
    if !assets_dir.is_dir() {
        return Ok(0);
    }

    let target = downloads.join(format!(
        "{}_assets",
        zip_filename.trim_end_matches(".zip")
    ));
    fs::create_dir_all(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;

    let mut copied = 0;
    for dir in [assets_dir.clone(), assets_dir.join(SCREENSHOTS_DIR)] {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        let mut images: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_asset_image(p))
            .collect();
        images.sort();

        for image in images {
            if image.file_name().and_then(|n| n.to_str()) == Some(ICON_FILE) {
                match resize_icon(&image, &target, &[128]) {
                    Ok(_) => copied += 1,
                    Err(e) => tracing::error!("Failed to process {}: {}", ICON_FILE, e),
                }
                continue;
            }

            let Some(name) = image.file_name() else {
                continue;
            };
            fs::copy(&image, target.join(name))
                .with_context(|| format!("failed to copy {}", image.display()))?;
            copied += 1;
        }
    }

    if copied > 0 {
        tracing::info!("Copied {} asset file(s) to {}", copied, target.display());
    }
    Ok(copied)
}

fn is_asset_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ASSET_IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Whether we run under WSL, judged from the kernel version string
pub fn detect_wsl() -> bool {
    fs::read_to_string("/proc/version")
        .map(|version| is_wsl_kernel(&version))
        .unwrap_or(false)
}

pub fn is_wsl_kernel(version: &str) -> bool {
    let version = version.to_lowercase();
    version.contains("microsoft") || version.contains("wsl")
}

/// Open each configured upload page. Under WSL the URLs are only listed.
pub fn open_upload_pages(config: &UploadConfig) {
    let urls: Vec<&str> = config
        .upload_urls
        .iter()
        .flatten()
        .map(UploadUrl::url)
        .filter(|url| !url.is_empty())
        .collect();

    if urls.is_empty() {
        tracing::warn!("No upload URLs configured in {}", UPLOAD_CONFIG_FILE);
        return;
    }

    let is_wsl = detect_wsl();
    if is_wsl {
        tracing::info!("WSL environment detected. Browser auto-open not available.");
        tracing::info!("Please visit the URLs below manually:");
    } else {
        tracing::info!("Opening upload pages in browser...");
    }

    for (i, url) in urls.iter().enumerate() {
        tracing::info!("{}. {}", i + 1, url);
        if !is_wsl {
            if let Err(e) = webbrowser::open(url) {
                tracing::warn!("   Failed to open browser: {}", e);
            }
        }
    }
}
