//! `==UserScript==` metadata block parsing
//!
//! The block is located with a regex, each `// @key value` line inside it is
//! recorded verbatim, and the known keys are then resolved into a typed
//! [`UserScriptMetadata`]. Everything outside the block is opaque.

use crate::error::{BuildError, BuildResult};
use crate::models::{
    RunAt, UserScriptMetadata, DEFAULT_LICENSE, DEFAULT_NAME, DEFAULT_VERSION, GRANT_NONE,
};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

pub const METADATA_OPEN: &str = "// ==UserScript==";
pub const METADATA_CLOSE: &str = "// ==/UserScript==";

/// Directive keys for run-at, in precedence order
const RUN_AT_KEYS: &[&str] = &["run-at", "runAt"];

lazy_static! {
    static ref METADATA_BLOCK_PATTERN: Regex =
        Regex::new(r"(?s)// ==UserScript==[ \t]*\r?\n(.*?)// ==/UserScript==").unwrap();

    // `// @key value`; the value may be absent (`// @noframes`)
    static ref METADATA_LINE_PATTERN: Regex =
        Regex::new(r"^// @(\S+)(?:\s+(.*))?$").unwrap();
}

/// Parse the metadata block of a userscript
pub fn parse_metadata(source: &str) -> BuildResult<UserScriptMetadata> {
    let block = extract_metadata_block(source)?;
    let raw = parse_metadata_lines(block);

    let grants = all_values(&raw, "grant");
    let grant_permissions = if grants.is_empty() {
        vec![GRANT_NONE.to_string()]
    } else {
        grants
    };

    Ok(UserScriptMetadata {
        name: first_value(&raw, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
        namespace: first_value(&raw, "namespace").unwrap_or_default(),
        version: first_value(&raw, "version").unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        description: first_value(&raw, "description").unwrap_or_default(),
        author: first_value(&raw, "author").unwrap_or_default(),
        license: first_value(&raw, "license").unwrap_or_else(|| DEFAULT_LICENSE.to_string()),
        match_patterns: all_values(&raw, "match"),
        grant_permissions,
        require_urls: all_values(&raw, "require"),
        resource_urls: all_values(&raw, "resource"),
        connect_urls: all_values(&raw, "connect"),
        run_at: parse_run_at(&raw),
        icon_url: first_value(&raw, "icon"),
        update_url: first_value(&raw, "updateURL"),
        download_url: first_value(&raw, "downloadURL"),
        support_url: first_value(&raw, "supportURL"),
        homepage_url: first_value(&raw, "homepage"),
        raw_metadata: raw,
    })
}

/// Read a script from disk and parse its metadata
pub fn parse_metadata_from_file(path: impl AsRef<Path>) -> BuildResult<UserScriptMetadata> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| BuildError::io(path, e))?;
    parse_metadata(&source).map_err(|e| match e {
        BuildError::Parse(msg) => BuildError::Parse(format!("{} ({})", msg, path.display())),
        other => other,
    })
}

/// Script body with every metadata block removed, surrounding whitespace trimmed
pub fn extract_code_body(source: &str) -> String {
    METADATA_BLOCK_PATTERN
        .replace_all(source, "")
        .trim()
        .to_string()
}

/// Whether `source` carries both block markers
pub fn is_userscript(source: &str) -> bool {
    source.contains(METADATA_OPEN) && source.contains(METADATA_CLOSE)
}

fn extract_metadata_block(source: &str) -> BuildResult<&str> {
    METADATA_BLOCK_PATTERN
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| BuildError::Parse("no UserScript metadata block found".to_string()))
}

fn parse_metadata_lines(block: &str) -> IndexMap<String, Vec<String>> {
    let mut metadata: IndexMap<String, Vec<String>> = IndexMap::new();

    for line in block.lines() {
        let Some(caps) = METADATA_LINE_PATTERN.captures(line.trim()) else {
            continue;
        };
        let key = caps[1].to_string();
        let value = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        metadata.entry(key).or_default().push(value);
    }

    metadata
}

/// First non-empty value of `key`; a bare `// @key` line does not count
fn first_value(metadata: &IndexMap<String, Vec<String>>, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(|values| values.iter().find(|v| !v.is_empty()))
        .cloned()
}

fn all_values(metadata: &IndexMap<String, Vec<String>>, key: &str) -> Vec<String> {
    metadata
        .get(key)
        .map(|values| values.iter().filter(|v| !v.is_empty()).cloned().collect())
        .unwrap_or_default()
}

fn parse_run_at(metadata: &IndexMap<String, Vec<String>>) -> RunAt {
    RUN_AT_KEYS
        .iter()
        .find_map(|key| first_value(metadata, key))
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}
