//! Bundle loading
//!
//! A bundle is an ordered stream of elements carrying named queries and the
//! documents that satisfy them. This crate turns such a stream into a
//! committed result:
//!
//! - [`types`]: the element variant set
//! - [`loader`]: the stateful loader validating element pairing
//! - [`mapping`]: query name -> matched keys, computed at commit time
//! - [`callback`]: the persistence interface the loader commits through
//! - [`progress`]: progress snapshots emitted while loading
//!
//! ## Usage
//!
//! ```ignore
//! let mut loader = BundleLoader::new(metadata, store);
//! for sized in elements {
//!     if let Some(progress) = loader.add_element(sized.element, sized.byte_size)? {
//!         observer(progress);
//!     }
//! }
//! let changes = loader.apply_changes()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod callback;
pub mod loader;
pub mod mapping;
pub mod progress;
pub mod types;

pub use callback::BundleCallback;
pub use loader::BundleLoader;
pub use mapping::query_document_mapping;
pub use progress::{LoadBundleTaskProgress, TaskState};
pub use types::{
    BundleDocument, BundleElement, BundleElementType, BundleMetadata, BundledDocumentMetadata,
    BundledQuery, LimitType, NamedQuery, SizedElement,
};
