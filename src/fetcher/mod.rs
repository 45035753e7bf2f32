//! Download of `@require` libraries

pub mod dependencies;

pub use dependencies::{library_filename, DependencyFetcher};

use anyhow::Result;
use std::path::Path;

/// Turns `@require` URLs into file names under `lib_dir`. Implementations
/// must return names in the order of `urls`; failed entries are dropped.
pub trait LibraryFetcher {
    fn fetch_libraries(&self, urls: &[String], lib_dir: &Path) -> Result<Vec<String>>;
}

/// Fetches over HTTP with [`DependencyFetcher`]
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl LibraryFetcher for HttpFetcher {
    fn fetch_libraries(&self, urls: &[String], lib_dir: &Path) -> Result<Vec<String>> {
        DependencyFetcher::new(lib_dir)?.fetch_all_blocking(urls)
    }
}
