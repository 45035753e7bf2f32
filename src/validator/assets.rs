//! Store listing asset checks
//!
//! Layout expected next to the script:
//!
//! ```text
//! store_assets/
//!   icon.png            required, source for the extension icons
//!   screenshots/        1 to 5 images (*.png, *.jpg, *.jpeg)
//!   upload_config.json  optional, see packager::upload
//! ```

use crate::error::{BuildError, BuildResult};
use crate::report::Reporter;
use std::fs;
use std::path::{Path, PathBuf};

pub const STORE_ASSETS_DIR: &str = "store_assets";
pub const ICON_FILE: &str = "icon.png";
pub const SCREENSHOTS_DIR: &str = "screenshots";
pub const MAX_SCREENSHOTS: usize = 5;
const SCREENSHOT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreAssets {
    pub icon: PathBuf,
    /// Sorted by file name
    pub screenshots: Vec<PathBuf>,
}

pub fn store_assets_dir(script_dir: &Path) -> PathBuf {
    script_dir.join(STORE_ASSETS_DIR)
}

pub fn validate_store_assets(script_dir: &Path, reporter: &dyn Reporter) -> BuildResult<StoreAssets> {
    let assets_dir = store_assets_dir(script_dir);
    if !assets_dir.is_dir() {
        return Err(BuildError::Asset(format!(
            "{}/ directory is required for Chrome Web Store submission. \
             Create it with {} and at least one screenshot in {}/{}/",
            STORE_ASSETS_DIR, ICON_FILE, STORE_ASSETS_DIR, SCREENSHOTS_DIR
        )));
    }

    let icon = assets_dir.join(ICON_FILE);
    if !icon.is_file() {
        return Err(BuildError::Asset(format!(
            "{} not found in {}/",
            ICON_FILE, STORE_ASSETS_DIR
        )));
    }

    let screenshots = list_screenshots(&assets_dir.join(SCREENSHOTS_DIR))?;
    if screenshots.is_empty() {
        return Err(BuildError::Asset(format!(
            "No screenshots found in {}/{}/. At least 1 screenshot (*.png or *.jpg) is required.",
            STORE_ASSETS_DIR, SCREENSHOTS_DIR
        )));
    }

    if screenshots.len() > MAX_SCREENSHOTS {
        reporter.warn(&format!(
            "Chrome Web Store allows at most {} screenshots, found {}",
            MAX_SCREENSHOTS,
            screenshots.len()
        ));
    }

    Ok(StoreAssets { icon, screenshots })
}

fn list_screenshots(dir: &Path) -> BuildResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(dir).map_err(|e| unreadable(dir, e))?;
    let mut screenshots: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_screenshot(path))
        .collect();
    screenshots.sort();
    Ok(screenshots)
}

fn unreadable(dir: &Path, err: std::io::Error) -> BuildError {
    BuildError::Asset(format!("cannot read {}: {}", dir.display(), err))
}

fn is_screenshot(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SCREENSHOT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::MemoryReporter;
    use tempfile::TempDir;

    fn setup(icon: bool, screenshots: usize) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let assets = temp_dir.path().join(STORE_ASSETS_DIR);
        fs::create_dir_all(assets.join(SCREENSHOTS_DIR)).unwrap();
        if icon {
            fs::write(assets.join(ICON_FILE), b"png").unwrap();
        }
        for i in 0..screenshots {
            fs::write(assets.join(SCREENSHOTS_DIR).join(format!("shot{}.png", i)), b"png").unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_valid_assets() {
        let temp_dir = setup(true, 2);
        let reporter = MemoryReporter::new();
        let assets = validate_store_assets(temp_dir.path(), &reporter).unwrap();
        assert_eq!(assets.screenshots.len(), 2);
        assert!(assets.icon.ends_with("store_assets/icon.png"));
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_unreadable_screenshots_dir_is_asset_error() {
        let dir = Path::new("store_assets/screenshots");
        let err = unreadable(dir, std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(matches!(err, BuildError::Asset(_)));
        assert!(err.to_string().contains("cannot read store_assets/screenshots"));
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = validate_store_assets(temp_dir.path(), &MemoryReporter::new()).unwrap_err();
        assert!(matches!(err, BuildError::Asset(_)));
    }

    #[test]
    fn test_missing_icon() {
        let temp_dir = setup(false, 1);
        let err = validate_store_assets(temp_dir.path(), &MemoryReporter::new()).unwrap_err();
        assert!(err.to_string().contains("icon.png not found"));
    }

    #[test]
    fn test_no_screenshots_is_fatal() {
        let temp_dir = setup(true, 0);
        let err = validate_store_assets(temp_dir.path(), &MemoryReporter::new()).unwrap_err();
        assert!(err.to_string().contains("No screenshots found"));
    }

    #[test]
    fn test_icon_is_not_a_screenshot() {
        let temp_dir = setup(true, 0);
        fs::write(temp_dir.path().join(STORE_ASSETS_DIR).join("promo.png"), b"png").unwrap();
        assert!(validate_store_assets(temp_dir.path(), &MemoryReporter::new()).is_err());
    }

    #[test]
    fn test_too_many_screenshots_only_warns() {
        let temp_dir = setup(true, MAX_SCREENSHOTS + 1);
        let reporter = MemoryReporter::new();
        let assets = validate_store_assets(temp_dir.path(), &reporter).unwrap();
        assert_eq!(assets.screenshots.len(), 6);
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn test_non_image_files_ignored() {
        let temp_dir = setup(true, 1);
        let shots = temp_dir.path().join(STORE_ASSETS_DIR).join(SCREENSHOTS_DIR);
        fs::write(shots.join("notes.txt"), b"x").unwrap();
        fs::write(shots.join("wide.JPG"), b"x").unwrap();
        let assets = validate_store_assets(temp_dir.path(), &MemoryReporter::new()).unwrap();
        assert_eq!(assets.screenshots.len(), 2);
    }
}
