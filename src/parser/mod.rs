//! Userscript parsing

pub mod metadata;

pub use metadata::{
    extract_code_body, is_userscript, parse_metadata, parse_metadata_from_file,
    METADATA_CLOSE, METADATA_OPEN,
};
