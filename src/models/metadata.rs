//! Userscript metadata model

use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Name used when a script declares no `@name`
pub const DEFAULT_NAME: &str = "Unnamed Script";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_LICENSE: &str = "MIT";
/// Grant value meaning "no GM APIs"
pub const GRANT_NONE: &str = "none";
/// Prefix shared by every GM-style capability (`GM_foo` and `GM.foo`)
pub const GM_API_PREFIX: &str = "GM";

/// When the script manager injects the script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunAt {
    DocumentStart,
    DocumentBody,
    #[default]
    DocumentEnd,
    DocumentIdle,
}

impl RunAt {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunAt::DocumentStart => "document-start",
            RunAt::DocumentBody => "document-body",
            RunAt::DocumentEnd => "document-end",
            RunAt::DocumentIdle => "document-idle",
        }
    }
}

impl fmt::Display for RunAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunAt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "document-start" => Ok(RunAt::DocumentStart),
            "document-body" => Ok(RunAt::DocumentBody),
            "document-end" => Ok(RunAt::DocumentEnd),
            "document-idle" => Ok(RunAt::DocumentIdle),
            other => Err(format!("unrecognized run-at value: {}", other)),
        }
    }
}

/// Parsed `==UserScript==` block. Built once per build and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScriptMetadata {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub license: String,
    pub match_patterns: Vec<String>,
    /// Never empty; `["none"]` when the script declares no `@grant`
    pub grant_permissions: Vec<String>,
    pub require_urls: Vec<String>,
    pub resource_urls: Vec<String>,
    pub connect_urls: Vec<String>,
    pub run_at: RunAt,
    pub icon_url: Option<String>,
    pub update_url: Option<String>,
    pub download_url: Option<String>,
    pub support_url: Option<String>,
    pub homepage_url: Option<String>,
    /// Every directive as written, keyed case-sensitively, in first-seen order
    pub raw_metadata: IndexMap<String, Vec<String>>,
}

impl UserScriptMetadata {
    /// True when any grant names a GM-style API
    pub fn uses_gm_api(&self) -> bool {
        self.grant_permissions.iter().any(|g| is_gm_api(g))
    }

    /// GM-style grants, de-duplicated, in declaration order
    pub fn required_apis(&self) -> Vec<&str> {
        let mut apis: Vec<&str> = Vec::new();
        for grant in self.grant_permissions.iter().filter(|g| is_gm_api(g)) {
            if !apis.contains(&grant.as_str()) {
                apis.push(grant);
            }
        }
        apis
    }

    /// First raw value recorded for `key`
    pub fn raw_value(&self, key: &str) -> Option<&str> {
        self.raw_metadata
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Render `raw_metadata` back into a metadata block
    pub fn to_metadata_block(&self) -> String {
        let mut block = String::from("// ==UserScript==\n");
        for (key, values) in &self.raw_metadata {
            for value in values {
                if value.is_empty() {
                    block.push_str(&format!("// @{}\n", key));
                } else {
                    block.push_str(&format!("// @{:<12} {}\n", key, value));
                }
            }
        }
        block.push_str("// ==/UserScript==\n");
        block
    }
}

fn is_gm_api(grant: &str) -> bool {
    grant != GRANT_NONE && grant.starts_with(GM_API_PREFIX)
}
