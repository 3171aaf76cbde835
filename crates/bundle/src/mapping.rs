//! Query to document mapping
//!
//! Each document metadata element lists the named queries the document
//! satisfies. At commit time this is inverted into query name -> keys.

use crate::types::{BundledDocumentMetadata, NamedQuery};
use docbundle_core::{DocumentKey, DocumentKeySet};
use rustc_hash::FxHashMap;

/// Compute the keys matched by every named query
///
/// Every declared query is present in the result, with an empty set when it
/// matched nothing. Query names referenced only by metadata also get an entry.
pub fn query_document_mapping(
    queries: &[NamedQuery],
    documents_metadata: &FxHashMap<DocumentKey, BundledDocumentMetadata>,
) -> FxHashMap<String, DocumentKeySet> {
    let mut result: FxHashMap<String, DocumentKeySet> = queries
        .iter()
        .map(|query| (query.query_name.clone(), DocumentKeySet::new()))
        .collect();

    for metadata in documents_metadata.values() {
        for query_name in &metadata.queries {
            result
                .entry(query_name.clone())
                .or_default()
                .insert(metadata.key.clone());
        }
    }

    result
}
