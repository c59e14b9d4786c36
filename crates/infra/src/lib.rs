//! Infrastructure layer: artifact files, environment config, process-wide caching.

pub mod artifacts;
pub mod cache;
pub mod config;

pub use artifacts::{ArtifactPaths, LoadError, LoadFailure, load};
pub use cache::BundleCell;
pub use config::AppConfig;
