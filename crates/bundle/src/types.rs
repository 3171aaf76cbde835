//! Bundle element types
//!
//! Already-parsed representations of the content of a bundle. A serialized
//! bundle is a sequence of elements:
//!
//! ```text
//! Metadata                 — summary: id, create time, totals
//! NamedQuery*              — queries captured by the bundle
//! (DocumentMetadata Document?)*
//!                          — per document: metadata, then the document
//!                            itself unless metadata says it does not exist
//! ```
//!
//! Element types are pure data. The byte-stream parser producing them lives
//! outside this crate.

use docbundle_core::{Document, DocumentKey, SnapshotVersion};
use serde::{Deserialize, Serialize};

// =============================================================================
// Metadata
// =============================================================================

/// Bundle summary, read before any other element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Bundle id, unique per logical bundle
    pub bundle_id: String,

    /// Schema version of the bundle
    pub version: u32,

    /// Time at which the bundle was built
    pub create_time: SnapshotVersion,

    /// Number of documents in the bundle, tombstones included
    pub total_documents: u32,

    /// Size of the serialized bundle in bytes
    pub total_bytes: u64,
}

// =============================================================================
// Named queries
// =============================================================================

/// Which end of the result a query limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LimitType {
    /// Limit to the first results
    #[default]
    First,
    /// Limit to the last results
    Last,
}

/// Query definition captured in a bundle
///
/// Opaque to the loader; stored as-is by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundledQuery {
    /// Parent resource path of the query
    pub parent: String,

    /// Structured query definition
    pub structured_query: serde_json::Value,

    /// Limit semantics
    #[serde(default)]
    pub limit_type: LimitType,
}

/// A query with a bundle-unique name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedQuery {
    /// Name of the query, unique within a bundle
    pub query_name: String,

    /// Query definition
    pub bundled_query: BundledQuery,

    /// Read time of the query results
    pub read_time: SnapshotVersion,
}

// =============================================================================
// Documents
// =============================================================================

/// Per-document metadata, precedes the document element (if any)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundledDocumentMetadata {
    /// Key of the document
    pub key: DocumentKey,

    /// Read time of the document
    pub read_time: SnapshotVersion,

    /// Whether the document exists at `read_time`
    pub exists: bool,

    /// Names of the queries this document satisfies
    #[serde(default)]
    pub queries: Vec<String>,
}

/// Full document payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleDocument {
    /// The document
    pub document: Document,
}

impl BundleDocument {
    /// Key of the document
    pub fn key(&self) -> &DocumentKey {
        &self.document.key
    }
}

// =============================================================================
// Element union
// =============================================================================

/// Kind of a bundle element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BundleElementType {
    /// Bundle summary
    Metadata,
    /// Named query
    NamedQuery,
    /// Document metadata
    DocumentMetadata,
    /// Document payload
    Document,
}

/// One element of a bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleElement {
    /// Bundle summary; consumed before loading starts
    Metadata(BundleMetadata),
    /// Named query
    NamedQuery(NamedQuery),
    /// Document metadata
    DocumentMetadata(BundledDocumentMetadata),
    /// Document payload
    Document(BundleDocument),
}

impl BundleElement {
    /// Kind of this element
    pub fn element_type(&self) -> BundleElementType {
        match self {
            BundleElement::Metadata(_) => BundleElementType::Metadata,
            BundleElement::NamedQuery(_) => BundleElementType::NamedQuery,
            BundleElement::DocumentMetadata(_) => BundleElementType::DocumentMetadata,
            BundleElement::Document(_) => BundleElementType::Document,
        }
    }
}

/// An element together with the number of bytes it occupied in the stream
#[derive(Debug, Clone, PartialEq)]
pub struct SizedElement {
    /// The parsed element
    pub element: BundleElement,
    /// Serialized size in bytes
    pub byte_size: u64,
}

impl SizedElement {
    /// Pair an element with its size
    pub fn new(element: BundleElement, byte_size: u64) -> Self {
        Self { element, byte_size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_element_types() {
        let key = DocumentKey::from_path("rooms/eros").unwrap();
        let meta = BundleElement::DocumentMetadata(BundledDocumentMetadata {
            key: key.clone(),
            read_time: SnapshotVersion::from_secs(1),
            exists: true,
            queries: vec![],
        });
        assert_eq!(meta.element_type(), BundleElementType::DocumentMetadata);

        let doc = BundleElement::Document(BundleDocument {
            document: Document::new(key, SnapshotVersion::from_secs(1), Default::default()),
        });
        assert_eq!(doc.element_type(), BundleElementType::Document);
    }

    #[test]
    fn test_named_query_from_json() {
        let element: BundleElement = serde_json::from_value(json!({
            "named_query": {
                "query_name": "limit-query",
                "bundled_query": {
                    "parent": "projects/p/databases/d/documents",
                    "structured_query": { "from": [{ "collectionId": "rooms" }], "limit": 1 },
                    "limit_type": "last"
                },
                "read_time": { "seconds": 10, "nanos": 0 }
            }
        }))
        .unwrap();

        assert_eq!(element.element_type(), BundleElementType::NamedQuery);
        match element {
            BundleElement::NamedQuery(query) => {
                assert_eq!(query.query_name, "limit-query");
                assert_eq!(query.bundled_query.limit_type, LimitType::Last);
                assert_eq!(query.read_time, SnapshotVersion::from_secs(10));
            }
            other => panic!("unexpected element {:?}", other),
        }
    }

    #[test]
    fn test_document_metadata_queries_default_empty() {
        let meta: BundledDocumentMetadata = serde_json::from_value(json!({
            "key": "rooms/eros",
            "read_time": { "seconds": 3, "nanos": 0 },
            "exists": false
        }))
        .unwrap();

        assert!(!meta.exists);
        assert!(meta.queries.is_empty());
    }
}
