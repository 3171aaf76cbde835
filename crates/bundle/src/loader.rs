//! Incremental bundle loader
//!
//! A `BundleLoader` consumes the elements of one bundle in stream order and
//! commits the result exactly once.
//!
//! ## Pairing
//!
//! A metadata element with `exists == true` leaves its key pending; the next
//! element must be the matching document. Metadata with `exists == false`
//! completes its key immediately with a tombstone. A document that does not
//! match the pending key is rejected and leaves the loader untouched.
//!
//! ## Commit
//!
//! `apply_changes` consumes the loader, so a session cannot be committed
//! twice. It checks that no key is pending and that the declared document
//! count was reached, then calls the [`BundleCallback`] in order:
//! documents, one save per named query, bundle summary.

use crate::callback::BundleCallback;
use crate::mapping::query_document_mapping;
use crate::progress::{LoadBundleTaskProgress, TaskState};
use crate::types::{
    BundleDocument, BundleElement, BundleMetadata, BundledDocumentMetadata, NamedQuery,
};
use docbundle_core::{
    BundleError, BundleResult, DocumentKey, DocumentKeySet, DocumentMap, MaybeDocument, NoDocument,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Loading session for a single bundle
pub struct BundleLoader {
    /// Bundle summary, read before loading started
    metadata: BundleMetadata,
    /// Persistence layer used on commit
    callback: Arc<dyn BundleCallback>,
    /// Completed documents and tombstones
    documents: DocumentMap,
    /// Metadata of every document seen so far
    documents_metadata: FxHashMap<DocumentKey, BundledDocumentMetadata>,
    /// Named queries in stream order
    queries: Vec<NamedQuery>,
    /// Key announced by metadata and still waiting for its document
    pending_key: Option<DocumentKey>,
    /// Bytes consumed so far
    bytes_loaded: u64,
}

impl BundleLoader {
    /// Start a session for the bundle described by `metadata`
    pub fn new(metadata: BundleMetadata, callback: Arc<dyn BundleCallback>) -> Self {
        Self {
            metadata,
            callback,
            documents: DocumentMap::new(),
            documents_metadata: FxHashMap::default(),
            queries: Vec::new(),
            pending_key: None,
            bytes_loaded: 0,
        }
    }

    /// Feed the next element of the bundle
    ///
    /// Returns a `Running` progress snapshot when the element completed a
    /// document, `None` otherwise.
    ///
    /// # Errors
    ///
    /// - `DocumentMismatch`: document without matching pending metadata
    /// - `DuplicateDocument`: key already completed in this bundle
    /// - `DocumentCountMismatch`: more documents than the bundle declares
    ///
    /// A failed call changes nothing, byte accounting included.
    ///
    /// # Panics
    ///
    /// Panics on a `BundleElement::Metadata`: the summary is consumed before
    /// the loader is created, so receiving one here is a caller bug.
    pub fn add_element(
        &mut self,
        element: BundleElement,
        byte_size: u64,
    ) -> BundleResult<Option<LoadBundleTaskProgress>> {
        let before_count = self.documents.len();

        match element {
            BundleElement::Metadata(_) => panic!("Unexpected bundle metadata element."),
            BundleElement::NamedQuery(query) => {
                debug!(query = %query.query_name, "Bundle named query");
                self.queries.push(query);
            }
            BundleElement::DocumentMetadata(document_metadata) => {
                self.add_document_metadata(document_metadata)?;
            }
            BundleElement::Document(document) => {
                self.add_document(document)?;
            }
        }

        self.bytes_loaded += byte_size;

        if self.documents.len() == before_count {
            return Ok(None);
        }

        Ok(Some(self.progress()))
    }

    fn add_document_metadata(
        &mut self,
        document_metadata: BundledDocumentMetadata,
    ) -> BundleResult<()> {
        let key = document_metadata.key.clone();
        self.check_insertable(&key)?;

        if document_metadata.exists {
            debug!(key = %key, "Bundle document metadata, awaiting document");
            self.pending_key = Some(key.clone());
        } else {
            debug!(key = %key, "Bundle document metadata, inserting tombstone");
            let tombstone = NoDocument::new(key.clone(), document_metadata.read_time, false);
            self.documents.insert(key.clone(), MaybeDocument::NoDocument(tombstone));
            self.pending_key = None;
        }

        self.documents_metadata.insert(key, document_metadata);
        Ok(())
    }

    fn add_document(&mut self, document: BundleDocument) -> BundleResult<()> {
        if self.pending_key.as_ref() != Some(document.key()) {
            return Err(BundleError::DocumentMismatch {
                key: document.key().clone(),
                pending: self.pending_key.clone(),
            });
        }

        let key = document.key().clone();
        debug!(key = %key, "Bundle document");
        self.documents.insert(key, MaybeDocument::Document(document.document));
        self.pending_key = None;
        Ok(())
    }

    /// Reject keys that would overwrite a completed document or exceed the
    /// declared total
    fn check_insertable(&self, key: &DocumentKey) -> BundleResult<()> {
        if self.documents.contains_key(key) {
            return Err(BundleError::DuplicateDocument { key: key.clone() });
        }
        if self.documents.len() >= self.metadata.total_documents as usize {
            return Err(BundleError::DocumentCountMismatch {
                expected: self.metadata.total_documents,
                actual: self.documents.len() + 1,
            });
        }
        Ok(())
    }

    fn progress(&self) -> LoadBundleTaskProgress {
        LoadBundleTaskProgress::new(
            u32::try_from(self.documents.len()).unwrap_or(u32::MAX),
            self.metadata.total_documents,
            self.bytes_loaded,
            self.metadata.total_bytes,
            TaskState::Running,
        )
    }

    /// Validate the session and commit it through the callback
    ///
    /// Returns the change set produced by `apply_bundled_documents`.
    ///
    /// # Errors
    ///
    /// - `UnterminatedDocument`: a metadata element is still waiting for its document
    /// - `DocumentCountMismatch`: the declared document count was not reached
    /// - any error returned by the callback, unchanged
    pub fn apply_changes(self) -> BundleResult<DocumentMap> {
        if let Some(key) = self.pending_key {
            return Err(BundleError::UnterminatedDocument { key });
        }
        if self.documents.len() != self.metadata.total_documents as usize {
            return Err(BundleError::DocumentCountMismatch {
                expected: self.metadata.total_documents,
                actual: self.documents.len(),
            });
        }

        let document_count = self.documents.len();
        let changes = self
            .callback
            .apply_bundled_documents(self.documents, &self.metadata.bundle_id)?;

        let mut query_document_map =
            query_document_mapping(&self.queries, &self.documents_metadata);
        for query in &self.queries {
            let matching_keys = query_document_map
                .remove(&query.query_name)
                .unwrap_or_else(DocumentKeySet::new);
            self.callback.save_named_query(query, &matching_keys)?;
        }

        self.callback.save_bundle(&self.metadata)?;

        info!(
            bundle_id = %self.metadata.bundle_id,
            documents = document_count,
            queries = self.queries.len(),
            changes = changes.len(),
            "Bundle committed"
        );
        Ok(changes)
    }

    /// Bundle summary
    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    /// Completed documents and tombstones
    pub fn documents(&self) -> &DocumentMap {
        &self.documents
    }

    /// Named queries seen so far
    pub fn named_queries(&self) -> &[NamedQuery] {
        &self.queries
    }

    /// Key awaiting its document, if any
    pub fn pending_key(&self) -> Option<&DocumentKey> {
        self.pending_key.as_ref()
    }

    /// Bytes consumed so far
    pub fn bytes_loaded(&self) -> u64 {
        self.bytes_loaded
    }
}

impl std::fmt::Debug for BundleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleLoader")
            .field("bundle_id", &self.metadata.bundle_id)
            .field("documents", &self.documents.len())
            .field("queries", &self.queries.len())
            .field("pending_key", &self.pending_key)
            .field("bytes_loaded", &self.bytes_loaded)
            .finish()
    }
}
