//! Persistence interface used by the loader
//!
//! The loader never touches storage directly. On commit it hands its results
//! to a `BundleCallback`, in this order:
//!
//! 1. `apply_bundled_documents` — once, with every accumulated document
//! 2. `save_named_query` — once per named query
//! 3. `save_bundle` — once, with the bundle summary
//!
//! Calls are synchronous. A failing call aborts the commit; earlier calls are
//! not rolled back.

use crate::types::{BundleMetadata, NamedQuery};
use docbundle_core::{BundleResult, DocumentKeySet, DocumentMap};

/// Persistence layer receiving a committed bundle
pub trait BundleCallback: Send + Sync {
    /// Commit documents and tombstones, returning the resulting changes
    fn apply_bundled_documents(
        &self,
        documents: DocumentMap,
        bundle_id: &str,
    ) -> BundleResult<DocumentMap>;

    /// Persist a query with the keys it matched in this bundle
    fn save_named_query(
        &self,
        query: &NamedQuery,
        matching_keys: &DocumentKeySet,
    ) -> BundleResult<()>;

    /// Record that the bundle has been fully loaded
    fn save_bundle(&self, metadata: &BundleMetadata) -> BundleResult<()>;
}
