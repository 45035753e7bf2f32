//! Shared utilities

pub mod helpers;
pub mod icons;

pub use helpers::{find_script_file, script_base_name};
pub use icons::generate_icon_sizes;
