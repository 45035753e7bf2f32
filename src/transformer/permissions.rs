//! GM grant to extension permission mapping

use crate::models::{UserScriptMetadata, ALL_URLS};
use std::collections::BTreeSet;

/// Permission tokens each GM API needs. `<all_urls>` is routed to host
/// permissions, everything else to API permissions.
static GM_API_PERMISSIONS: &[(&str, &[&str])] = &[
    ("GM_xmlhttpRequest", &[ALL_URLS]),
    ("GM_xmlHttpRequest", &[ALL_URLS]),
    ("GM.xmlHttpRequest", &[ALL_URLS]),
    ("GM_addStyle", &[]),
    ("GM.addStyle", &[]),
    ("GM_setValue", &["storage"]),
    ("GM.setValue", &["storage"]),
    ("GM_getValue", &["storage"]),
    ("GM.getValue", &["storage"]),
    ("GM_deleteValue", &["storage"]),
    ("GM.deleteValue", &["storage"]),
    ("GM_listValues", &["storage"]),
    ("GM.listValues", &["storage"]),
    ("GM_notification", &["notifications"]),
    ("GM.notification", &["notifications"]),
    ("GM_setClipboard", &["clipboardWrite"]),
    ("GM.setClipboard", &["clipboardWrite"]),
    ("GM_openInTab", &["tabs"]),
    ("GM.openInTab", &["tabs"]),
    ("GM_download", &["downloads", ALL_URLS]),
    ("GM.download", &["downloads", ALL_URLS]),
];

/// Sorted, de-duplicated permission sets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub permissions: BTreeSet<String>,
    pub host_permissions: BTreeSet<String>,
}

impl PermissionSet {
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.host_permissions.is_empty()
    }
}

/// Tokens registered for a grant. Unknown grants and `none` map to nothing.
pub fn permissions_for(grant: &str) -> &'static [&'static str] {
    GM_API_PERMISSIONS
        .iter()
        .find(|(api, _)| *api == grant)
        .map(|(_, perms)| *perms)
        .unwrap_or(&[])
}

pub fn map_permissions(metadata: &UserScriptMetadata) -> PermissionSet {
    let mut set = PermissionSet::default();

    for grant in &metadata.grant_permissions {
        for perm in permissions_for(grant) {
            if *perm == ALL_URLS {
                set.host_permissions.insert(ALL_URLS.to_string());
            } else {
                set.permissions.insert(perm.to_string());
            }
        }
    }

    // @connect entries are taken as literal host patterns
    set.host_permissions
        .extend(metadata.connect_urls.iter().cloned());

    set
}
