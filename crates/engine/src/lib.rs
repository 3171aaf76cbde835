//! Bundle engine
//!
//! This crate runs bundle loads end to end on top of the loader:
//! - Config: `bundle.toml` loader settings
//! - MemoryBundleStore: in-memory persistence layer for bundle contents
//! - load_bundle: one complete loading session with progress reporting
//!
//! The loader itself knows nothing about stores or observers; the engine is
//! the only component that wires them together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod store;
pub mod task;

pub use config::{BundleConfig, CONFIG_FILE_NAME};
pub use store::{MemoryBundleStore, SavedQuery};
pub use task::{load_bundle, BundleCache, LoadBundleOutcome};
