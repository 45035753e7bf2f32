//! Transformations from userscript metadata to extension artifacts

pub mod manifest;
pub mod permissions;
pub mod polyfill;

pub use manifest::{manifest_to_json, normalize_version, ManifestBuilder};
pub use permissions::{map_permissions, PermissionSet};
pub use polyfill::PolyfillInjector;
