//! Document model
//!
//! A key either maps to a live [`Document`] or to a [`NoDocument`] tombstone
//! recording that the key was observed absent at some version.
//! [`MaybeDocument`] is the closed union of the two.

use crate::key::DocumentKey;
use crate::version::SnapshotVersion;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Field data of a document
pub type ObjectValue = serde_json::Map<String, serde_json::Value>;

/// Ordered map from key to document or tombstone
pub type DocumentMap = BTreeMap<DocumentKey, MaybeDocument>;

/// Ordered set of document keys
pub type DocumentKeySet = BTreeSet<DocumentKey>;

/// A live document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document key
    pub key: DocumentKey,
    /// Read time of this document
    pub version: SnapshotVersion,
    /// Field data
    #[serde(default)]
    pub data: ObjectValue,
}

impl Document {
    /// Create a document
    pub fn new(key: DocumentKey, version: SnapshotVersion, data: ObjectValue) -> Self {
        Self { key, version, data }
    }
}

/// Tombstone for a key known to be absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoDocument {
    /// Document key
    pub key: DocumentKey,
    /// Read time at which the document was absent
    pub version: SnapshotVersion,
    /// Whether the deletion came from a local write
    pub has_committed_mutations: bool,
}

impl NoDocument {
    /// Create a tombstone
    pub fn new(key: DocumentKey, version: SnapshotVersion, has_committed_mutations: bool) -> Self {
        Self {
            key,
            version,
            has_committed_mutations,
        }
    }
}

/// Document or tombstone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaybeDocument {
    /// Live document
    Document(Document),
    /// Tombstone
    NoDocument(NoDocument),
}

impl MaybeDocument {
    /// Key of the underlying entry
    pub fn key(&self) -> &DocumentKey {
        match self {
            MaybeDocument::Document(doc) => &doc.key,
            MaybeDocument::NoDocument(doc) => &doc.key,
        }
    }

    /// Version of the underlying entry
    pub fn version(&self) -> SnapshotVersion {
        match self {
            MaybeDocument::Document(doc) => doc.version,
            MaybeDocument::NoDocument(doc) => doc.version,
        }
    }

    /// True for a tombstone
    pub fn is_tombstone(&self) -> bool {
        matches!(self, MaybeDocument::NoDocument(_))
    }

    /// The live document, if any
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            MaybeDocument::Document(doc) => Some(doc),
            MaybeDocument::NoDocument(_) => None,
        }
    }
}

impl From<Document> for MaybeDocument {
    fn from(doc: Document) -> Self {
        MaybeDocument::Document(doc)
    }
}

impl From<NoDocument> for MaybeDocument {
    fn from(doc: NoDocument) -> Self {
        MaybeDocument::NoDocument(doc)
    }
}
