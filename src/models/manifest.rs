//! Manifest V3 data structures for the generated extension

use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: u8 = 3;
/// Entry script written at the extension root
pub const CONTENT_SCRIPT_FILE: &str = "content.js";
/// Directory holding fetched `@require` libraries
pub const LIB_DIR: &str = "lib";
pub const ICONS_DIR: &str = "icons";
/// Host permission granting access to every URL
pub const ALL_URLS: &str = "<all_urls>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: u8,
    pub name: String,
    pub version: String,
    pub description: String,

    pub content_scripts: Vec<ContentScript>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_permissions: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<IconSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentScript {
    pub matches: Vec<String>,
    pub js: Vec<String>,
    pub run_at: String,
}

/// Fixed three-size icon table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSet {
    #[serde(rename = "16")]
    pub small: String,
    #[serde(rename = "48")]
    pub medium: String,
    #[serde(rename = "128")]
    pub large: String,
}

impl IconSet {
    pub const SIZES: [u32; 3] = [16, 48, 128];

    pub fn file_name(size: u32) -> String {
        format!("icon{}.png", size)
    }

    pub fn standard() -> Self {
        let path = |size| format!("{}/{}", ICONS_DIR, Self::file_name(size));
        Self {
            small: path(16),
            medium: path(48),
            large: path(128),
        }
    }
}

impl Manifest {
    /// The single content-script entry
    pub fn content_script(&self) -> Option<&ContentScript> {
        self.content_scripts.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_set_serializes_in_size_order() {
        let json = serde_json::to_string(&IconSet::standard()).unwrap();
        assert_eq!(
            json,
            r#"{"16":"icons/icon16.png","48":"icons/icon48.png","128":"icons/icon128.png"}"#
        );
    }

    #[test]
    fn test_empty_permissions_are_omitted() {
        let manifest = Manifest {
            manifest_version: MANIFEST_VERSION,
            name: "Test".to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            content_scripts: vec![ContentScript {
                matches: vec![ALL_URLS.to_string()],
                js: vec![CONTENT_SCRIPT_FILE.to_string()],
                run_at: "document_end".to_string(),
            }],
            permissions: vec![],
            host_permissions: vec![],
            icons: None,
            homepage_url: None,
        };

        let value = serde_json::to_value(&manifest).unwrap();
        assert!(value.get("permissions").is_none());
        assert!(value.get("host_permissions").is_none());
        assert!(value.get("icons").is_none());
        assert_eq!(value["description"], "");
    }
}
