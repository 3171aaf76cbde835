//! Document keys
//!
//! A document key is the slash-separated path of a document, e.g.
//! `rooms/eros/messages/1`. Paths alternate collection and document ids,
//! so a valid key always has an even, non-zero number of segments.
//!
//! ## Ordering
//!
//! Keys order segment by segment, which keeps every document of a
//! collection contiguous in a `BTreeMap`.

use crate::error::{BundleError, BundleResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Path separator
pub const PATH_SEPARATOR: char = '/';

/// Identifier of a document, immutable once created
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey {
    segments: Vec<String>,
}

impl DocumentKey {
    /// Parse a key from its slash-separated path
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the path is empty, contains an empty segment,
    /// or has an odd number of segments.
    pub fn from_path(path: &str) -> BundleResult<Self> {
        Self::from_segments(path.split(PATH_SEPARATOR).map(str::to_string).collect())
    }

    /// Build a key from already split segments
    pub fn from_segments(segments: Vec<String>) -> BundleResult<Self> {
        if segments.iter().any(String::is_empty) {
            return Err(BundleError::InvalidKey(format!(
                "'{}' contains an empty segment",
                segments.join("/")
            )));
        }
        if segments.is_empty() || segments.len() % 2 != 0 {
            return Err(BundleError::InvalidKey(format!(
                "'{}' has {} segments, a document path needs an even number",
                segments.join("/"),
                segments.len()
            )));
        }
        Ok(Self { segments })
    }

    /// Path segments of this key
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Id of the document (last segment)
    pub fn document_id(&self) -> &str {
        // from_segments guarantees at least two segments
        &self.segments[self.segments.len() - 1]
    }

    /// Path of the collection holding this document
    pub fn collection_path(&self) -> String {
        self.segments[..self.segments.len() - 1].join("/")
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = BundleError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        DocumentKey::from_path(&path)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.to_string()
    }
}
