//! Build reporting
//!
//! Core components log through an injected [`Reporter`] instead of a global
//! logger, so they stay testable without a subscriber installed.

pub mod reporter;

pub use reporter::{Level, MemoryReporter, Reporter, TracingReporter};
