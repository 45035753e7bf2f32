//! Core data models for userscript conversion

pub mod manifest;
pub mod metadata;
pub mod options;

pub use manifest::*;
pub use metadata::*;
pub use options::*;
