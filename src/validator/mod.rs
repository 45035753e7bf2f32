//! Store submission checks

pub mod assets;
pub mod store;

pub use assets::{validate_store_assets, StoreAssets};
pub use store::validate_store_readiness;
