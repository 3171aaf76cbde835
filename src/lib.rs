//! Docbundle - incremental loading of document bundles
//!
//! A bundle is a self-contained, ordered stream of named queries and the
//! documents that satisfy them. Loading one fills a local document cache
//! without a round trip to the backing service.
//!
//! # Quick Start
//!
//! ```ignore
//! use docbundle::{load_bundle, BundleConfig, MemoryBundleStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryBundleStore::new());
//! let outcome = load_bundle(&store, &BundleConfig::default(), metadata, elements, |progress| {
//!     println!("{}/{}", progress.documents_loaded, progress.total_documents);
//! })?;
//! ```
//!
//! # Architecture
//!
//! - `docbundle-core`: document model and errors
//! - `docbundle-bundle`: element types and the [`BundleLoader`] state machine
//! - `docbundle-engine`: config, in-memory store, load driver

pub use docbundle_bundle::*;
pub use docbundle_core::*;
pub use docbundle_engine::*;
