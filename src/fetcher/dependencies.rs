//! Concurrent library downloader
//!
//! Downloads run concurrently but results come back in declaration order, so
//! the manifest's script list is stable across runs. A failed download is
//! logged and left out of the result.

use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_CONCURRENT_DOWNLOADS: usize = 4;

pub struct DependencyFetcher {
    lib_dir: PathBuf,
    client: Client,
}

impl DependencyFetcher {
    pub fn new(lib_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_timeout(lib_dir, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(lib_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            lib_dir: lib_dir.into(),
            client,
        })
    }

    pub fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    /// Download every URL; returns the file names that made it to disk
    pub async fn fetch_all(&self, urls: &[String]) -> Result<Vec<String>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        tracing::warn!(
            "Chrome Web Store policy: all code must ship inside the extension package. \
             Bundling {} remote dependenc{}; make sure they comply with store policies.",
            urls.len(),
            if urls.len() == 1 { "y" } else { "ies" }
        );

        tokio::fs::create_dir_all(&self.lib_dir)
            .await
            .with_context(|| format!("failed to create {}", self.lib_dir.display()))?;

        let names = unique_filenames(urls);
        let results: Vec<(String, Result<String>)> = stream::iter(urls.iter().cloned().zip(names))
            .map(|(url, filename)| async move {
                let result = match filename {
                    Some(filename) => self.fetch_as(&url, filename).await,
                    None => Err(anyhow::anyhow!("cannot derive a file name from {}", url)),
                };
                (url, result)
            })
            .buffered(MAX_CONCURRENT_DOWNLOADS)
            .collect()
            .await;

        let mut downloaded = Vec::with_capacity(results.len());
        for (url, result) in results {
            match result {
                Ok(filename) => downloaded.push(filename),
                Err(err) => tracing::error!("Failed to download {}: {:#}", url, err),
            }
        }

        Ok(downloaded)
    }

    /// Download one library unless it is already present in the lib directory
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let filename = library_filename(url)
            .with_context(|| format!("cannot derive a file name from {}", url))?;
        self.fetch_as(url, filename).await
    }

    async fn fetch_as(&self, url: &str, filename: String) -> Result<String> {
        let output_path = self.lib_dir.join(&filename);

        if tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            tracing::info!("File already exists: {}", filename);
            return Ok(filename);
        }

        tracing::info!("Downloading {}...", url);
        let bytes = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("server returned an error for {}", url))?
            .bytes()
            .await
            .with_context(|| format!("failed to read body of {}", url))?;

        tokio::fs::write(&output_path, &bytes)
            .await
            .with_context(|| format!("failed to write {}", output_path.display()))?;

        tracing::info!("Downloaded: {} -> {}", url, filename);
        Ok(filename)
    }

    /// Run [`fetch_all`](Self::fetch_all) on a private runtime
    pub fn fetch_all_blocking(&self, urls: &[String]) -> Result<Vec<String>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to initialize async runtime")?;
        runtime.block_on(self.fetch_all(urls))
    }
}

/// Last path segment of `url`, with `.js` appended when it has no extension
pub fn library_filename(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())?;

    if segment.contains('.') {
        Some(segment.to_string())
    } else {
        Some(format!("{}.js", segment))
    }
}

/// [`library_filename`] for each URL, with `-2`, `-3`, ... inserted before
/// the extension when an earlier URL already claimed the name
fn unique_filenames(urls: &[String]) -> Vec<Option<String>> {
    let mut taken = HashSet::new();
    urls.iter()
        .map(|url| {
            let name = library_filename(url)?;
            let mut candidate = name.clone();
            let mut n = 2;
            while !taken.insert(candidate.clone()) {
                candidate = numbered_filename(&name, n);
                n += 1;
            }
            Some(candidate)
        })
        .collect()
}

fn numbered_filename(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}-{}.{}", stem, n, ext),
        None => format!("{}-{}", name, n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test_case("https://example.com/lib/foo-bar.js", Some("foo-bar.js") ; "plain js")]
    #[test_case("https://cdn.example.com/npm/lodash@4/lodash.min.js?v=1", Some("lodash.min.js") ; "query stripped")]
    #[test_case("https://example.com/lib/jquery", Some("jquery.js") ; "extension added")]
    #[test_case("https://example.com/", None ; "no file segment")]
    #[test_case("not a url", None ; "unparseable")]
    fn test_library_filename(url: &str, expected: Option<&str>) {
        assert_eq!(library_filename(url).as_deref(), expected);
    }

    #[tokio::test]
    async fn test_cached_files_keep_declaration_order() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.js", "a.js"] {
            std::fs::write(temp_dir.path().join(name), "// cached").unwrap();
        }

        let fetcher = DependencyFetcher::new(temp_dir.path()).unwrap();
        let urls = vec![
            "https://example.invalid/b.js".to_string(),
            "https://example.invalid/a.js".to_string(),
        ];
        let files = fetcher.fetch_all(&urls).await.unwrap();
        assert_eq!(files, vec!["b.js", "a.js"]);
    }

    #[tokio::test]
    async fn test_same_file_name_from_different_urls_stays_distinct() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["index.js", "index-2.js"] {
            std::fs::write(temp_dir.path().join(name), "// cached").unwrap();
        }

        let fetcher = DependencyFetcher::new(temp_dir.path()).unwrap();
        let urls = vec![
            "https://cdn-a.invalid/liba/index.js".to_string(),
            "https://cdn-b.invalid/libb/index.js".to_string(),
        ];
        let files = fetcher.fetch_all(&urls).await.unwrap();
        assert_eq!(files, vec!["index.js", "index-2.js"]);
    }

    #[test]
    fn test_unique_filenames() {
        let urls: Vec<String> = [
            "https://a.example.com/x/index.js",
            "https://b.example.com/y/index.js",
            "https://example.com/",
            "https://c.example.com/z/index.js",
            "https://example.com/lib/jquery",
            "https://example.com/other/jquery.js",
        ]
        .iter()
        .map(|u| u.to_string())
        .collect();

        assert_eq!(
            unique_filenames(&urls),
            vec![
                Some("index.js".to_string()),
                Some("index-2.js".to_string()),
                None,
                Some("index-3.js".to_string()),
                Some("jquery.js".to_string()),
                Some("jquery-2.js".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_download_is_omitted() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("kept.js"), "// cached").unwrap();

        let fetcher = DependencyFetcher::new(temp_dir.path()).unwrap();
        let urls = vec![
            "https://example.com/".to_string(),
            "https://example.invalid/kept.js".to_string(),
        ];
        let files = fetcher.fetch_all(&urls).await.unwrap();
        assert_eq!(files, vec!["kept.js"]);
    }

    #[tokio::test]
    async fn test_no_urls_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let lib_dir = temp_dir.path().join("lib");
        let fetcher = DependencyFetcher::new(&lib_dir).unwrap();
        assert!(fetcher.fetch_all(&[]).await.unwrap().is_empty());
        assert!(!lib_dir.exists());
    }
}
