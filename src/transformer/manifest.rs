//! Manifest V3 generation from userscript metadata

use super::permissions::PermissionSet;
use crate::error::BuildResult;
use crate::models::{
    ContentScript, IconSet, Manifest, RunAt, UserScriptMetadata, ALL_URLS, CONTENT_SCRIPT_FILE,
    LIB_DIR, MANIFEST_VERSION,
};

pub struct ManifestBuilder<'a> {
    metadata: &'a UserScriptMetadata,
    permissions: &'a PermissionSet,
    lib_files: &'a [String],
    has_icons: bool,
}

impl<'a> ManifestBuilder<'a> {
    pub fn new(
        metadata: &'a UserScriptMetadata,
        permissions: &'a PermissionSet,
        lib_files: &'a [String],
        has_icons: bool,
    ) -> Self {
        Self {
            metadata,
            permissions,
            lib_files,
            has_icons,
        }
    }

    pub fn build(&self) -> Manifest {
        Manifest {
            manifest_version: MANIFEST_VERSION,
            name: self.metadata.name.clone(),
            version: normalize_version(&self.metadata.version),
            description: self.metadata.description.clone(),
            content_scripts: vec![ContentScript {
                matches: self.match_patterns(),
                js: js_files(self.lib_files),
                run_at: map_run_at(self.metadata.run_at).to_string(),
            }],
            permissions: self.permissions.permissions.iter().cloned().collect(),
            host_permissions: self.permissions.host_permissions.iter().cloned().collect(),
            icons: self.has_icons.then(IconSet::standard),
            homepage_url: self.metadata.homepage_url.clone(),
        }
    }

    fn match_patterns(&self) -> Vec<String> {
        if self.metadata.match_patterns.is_empty() {
            vec![ALL_URLS.to_string()]
        } else {
            self.metadata.match_patterns.clone()
        }
    }
}

/// Strip a leading `v`/`V` and pad to at least three components
pub fn normalize_version(version: &str) -> String {
    let version = version.trim().trim_start_matches(&['v', 'V'][..]);
    let parts = version.split('.').count();
    let mut normalized = version.to_string();
    for _ in parts..3 {
        normalized.push_str(".0");
    }
    normalized
}

/// Userscript run-at to the manifest's `run_at` value
pub fn map_run_at(run_at: RunAt) -> &'static str {
    match run_at {
        RunAt::DocumentStart => "document_start",
        RunAt::DocumentBody | RunAt::DocumentEnd => "document_end",
        RunAt::DocumentIdle => "document_idle",
    }
}

/// Library files in fetch order, main script last
pub fn js_files(lib_files: &[String]) -> Vec<String> {
    lib_files
        .iter()
        .map(|lib| format!("{}/{}", LIB_DIR, lib))
        .chain(std::iter::once(CONTENT_SCRIPT_FILE.to_string()))
        .collect()
}

/// Indented JSON with non-ASCII text kept literal
pub fn manifest_to_json(manifest: &Manifest) -> BuildResult<String> {
    Ok(serde_json::to_string_pretty(manifest)?)
}
