//! Build error taxonomy
//!
//! Core components return [`BuildError`] so callers can tell a malformed
//! script apart from a store-policy violation or a failed icon render. Glue
//! code wraps these in `anyhow` with extra context.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// Metadata block missing or unreadable
    #[error("failed to parse userscript: {0}")]
    Parse(String),

    /// A fatal store-readiness rule was violated
    #[error("store validation failed: {0}")]
    Validation(String),

    /// Required store assets are missing or unreadable
    #[error("store assets invalid: {0}")]
    Asset(String),

    /// Icon generation reported failure
    #[error("icon generation failed: {0}")]
    Generation(String),

    #[error("no userscript found in directory: {}", .0.display())]
    ScriptNotFound(PathBuf),

    #[error(
        "multiple userscripts found in directory: {}. Keep exactly one. Found: {}",
        dir.display(),
        names.join(", ")
    )]
    AmbiguousScript { dir: PathBuf, names: Vec<String> },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type BuildResult<T> = std::result::Result<T, BuildError>;
