//! Output directory writing and store packaging

pub mod archive;
pub mod builder;
pub mod upload;

pub use archive::create_zip_from_directory;
pub use builder::{prepare_output_dir, write_content_script, write_manifest};
pub use upload::{load_upload_config, open_upload_pages, package_extension, UploadConfig};
