//! In-memory bundle store
//!
//! `MemoryBundleStore` is a complete [`BundleCallback`] backed by maps behind
//! `RwLock`s. It keeps the newest version of every document, the named queries
//! with their matched keys, and the summary of every loaded bundle so a
//! reload of the same bundle can be detected.

use docbundle_bundle::{BundleCallback, BundleMetadata, NamedQuery};
use docbundle_core::{BundleResult, DocumentKey, DocumentKeySet, DocumentMap, MaybeDocument};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

/// A named query as persisted by the store
#[derive(Debug, Clone, PartialEq)]
pub struct SavedQuery {
    /// Query definition
    pub query: NamedQuery,
    /// Keys the query matched in the bundle that carried it
    pub matching_keys: DocumentKeySet,
}

/// Thread-safe in-memory store for bundle contents
#[derive(Debug, Default)]
pub struct MemoryBundleStore {
    documents: RwLock<DocumentMap>,
    queries: RwLock<FxHashMap<String, SavedQuery>>,
    bundles: RwLock<FxHashMap<String, BundleMetadata>>,
}

impl MemoryBundleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a document or tombstone
    pub fn get_document(&self, key: &DocumentKey) -> Option<MaybeDocument> {
        self.documents.read().get(key).cloned()
    }

    /// Number of stored entries, tombstones included
    pub fn document_count(&self) -> usize {
        self.documents.read().len()
    }

    /// Look up a saved named query
    pub fn get_named_query(&self, name: &str) -> Option<SavedQuery> {
        self.queries.read().get(name).cloned()
    }

    /// Look up the summary of a loaded bundle
    pub fn get_bundle_metadata(&self, bundle_id: &str) -> Option<BundleMetadata> {
        self.bundles.read().get(bundle_id).cloned()
    }

    /// True when this bundle was already loaded at the same or a newer
    /// create time
    pub fn has_newer_bundle(&self, metadata: &BundleMetadata) -> bool {
        self.bundles
            .read()
            .get(&metadata.bundle_id)
            .map_or(false, |stored| stored.create_time >= metadata.create_time)
    }
}

impl BundleCallback for MemoryBundleStore {
    fn apply_bundled_documents(
        &self,
        documents: DocumentMap,
        bundle_id: &str,
    ) -> BundleResult<DocumentMap> {
        let mut stored = self.documents.write();
        let mut changes = DocumentMap::new();

        for (key, incoming) in documents {
            let newer = stored
                .get(&key)
                .map_or(true, |existing| incoming.version() > existing.version());
            if !newer {
                debug!(
                    bundle_id,
                    key = %key,
                    "Skipping bundled document, stored version is not older"
                );
                continue;
            }
            stored.insert(key.clone(), incoming.clone());
            changes.insert(key, incoming);
        }

        debug!(bundle_id, changes = changes.len(), "Applied bundled documents");
        Ok(changes)
    }

    fn save_named_query(
        &self,
        query: &NamedQuery,
        matching_keys: &DocumentKeySet,
    ) -> BundleResult<()> {
        self.queries.write().insert(
            query.query_name.clone(),
            SavedQuery {
                query: query.clone(),
                matching_keys: matching_keys.clone(),
            },
        );
        Ok(())
    }

    fn save_bundle(&self, metadata: &BundleMetadata) -> BundleResult<()> {
        self.bundles
            .write()
            .insert(metadata.bundle_id.clone(), metadata.clone());
        Ok(())
    }
}
