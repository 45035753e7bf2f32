//! Helper utility functions

use crate::error::{BuildError, BuildResult};
use crate::parser::is_userscript;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the single `*.js` file in `script_dir` that carries a metadata block
pub fn find_script_file(script_dir: &Path) -> BuildResult<PathBuf> {
    let entries = fs::read_dir(script_dir).map_err(|e| BuildError::io(script_dir, e))?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|path| path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("js"))
        .filter(|path| {
            // unreadable or non-UTF-8 files are not userscripts
            fs::read_to_string(path)
                .map(|content| is_userscript(&content))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(BuildError::ScriptNotFound(script_dir.to_path_buf())),
        1 => Ok(candidates.remove(0)),
        _ => Err(BuildError::AmbiguousScript {
            dir: script_dir.to_path_buf(),
            names: candidates
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}

/// File name without `.user.js` / `.js`
pub fn script_base_name(file_name: &str) -> &str {
    file_name
        .strip_suffix(".user.js")
        .or_else(|| file_name.strip_suffix(".js"))
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "// ==UserScript==\n// @name Test\n// ==/UserScript==\n";

    #[test]
    fn test_script_base_name() {
        assert_eq!(script_base_name("dark-mode.user.js"), "dark-mode");
        assert_eq!(script_base_name("dark-mode.js"), "dark-mode");
        assert_eq!(script_base_name("README"), "README");
    }

    #[test]
    fn test_find_single_script() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("helper.js"), "console.log(1);").unwrap();
        fs::write(temp_dir.path().join("main.user.js"), HEADER).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), HEADER).unwrap();

        let found = find_script_file(temp_dir.path()).unwrap();
        assert!(found.ends_with("main.user.js"));
    }

    #[test]
    fn test_no_script() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("helper.js"), "console.log(1);").unwrap();
        let err = find_script_file(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BuildError::ScriptNotFound(_)));
    }

    #[test]
    fn test_multiple_scripts() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.user.js"), HEADER).unwrap();
        fs::write(temp_dir.path().join("b.user.js"), HEADER).unwrap();

        match find_script_file(temp_dir.path()).unwrap_err() {
            BuildError::AmbiguousScript { names, .. } => {
                assert_eq!(names, vec!["a.user.js", "b.user.js"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
