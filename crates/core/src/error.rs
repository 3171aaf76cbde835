//! Error types for bundle loading
//!
//! One error enum covers the whole workspace. We use `thiserror` for
//! automatic `Display` and `Error` trait implementations.
//!
//! ## Error kinds
//!
//! - Loader data errors (`DocumentMismatch`, `UnterminatedDocument`,
//!   `DuplicateDocument`, `DocumentCountMismatch`) signal a malformed or
//!   truncated bundle.
//! - `Storage` is produced by the persistence layer and is propagated untouched.
//! - `InvalidKey` / `InvalidInput` reject malformed model values and config.
//! - `Internal` wraps failures around config files.
//!
//! Feeding a bundle summary element into the loader is a caller bug and
//! panics instead of producing one of these.

use crate::key::DocumentKey;
use thiserror::Error;

/// Result type for bundle operations
pub type BundleResult<T> = Result<T, BundleError>;

/// Coarse classification of a [`BundleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The bundle or a caller-supplied value is malformed
    InvalidArgument,
    /// The persistence layer failed
    Storage,
    /// Unexpected failure outside of bundle data
    Internal,
}

/// Errors that can occur while loading a bundle
#[derive(Debug, Error)]
pub enum BundleError {
    /// A document element arrived without matching pending metadata
    #[error("The document being added does not match the stored metadata (document: {key}, pending: {})", display_pending(.pending))]
    DocumentMismatch {
        /// Key of the rejected document
        key: DocumentKey,
        /// Key announced by the preceding metadata element, if any
        pending: Option<DocumentKey>,
    },

    /// The element stream ended on metadata still awaiting its document
    #[error("Bundled documents end with a document metadata element instead of a document (pending: {key})")]
    UnterminatedDocument {
        /// Key still awaiting its document
        key: DocumentKey,
    },

    /// A bundle carried the same document twice
    #[error("Document {key} appears more than once in the bundle")]
    DuplicateDocument {
        /// Repeated key
        key: DocumentKey,
    },

    /// Number of loaded documents differs from the bundle summary
    #[error("Loaded documents count is not the same as in metadata: expected {expected}, got {actual}")]
    DocumentCountMismatch {
        /// Count declared in the bundle metadata
        expected: u32,
        /// Count actually accumulated
        actual: usize,
    },

    /// Malformed document key
    #[error("Invalid document key: {0}")]
    InvalidKey(String),

    /// Malformed input value or configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal failure (config file I/O and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn display_pending(pending: &Option<DocumentKey>) -> String {
    match pending {
        Some(key) => key.to_string(),
        None => "none".to_string(),
    }
}

impl BundleError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Classify this error
    pub fn code(&self) -> ErrorCode {
        match self {
            BundleError::DocumentMismatch { .. }
            | BundleError::UnterminatedDocument { .. }
            | BundleError::DuplicateDocument { .. }
            | BundleError::DocumentCountMismatch { .. }
            | BundleError::InvalidKey(_)
            | BundleError::InvalidInput(_) => ErrorCode::InvalidArgument,
            BundleError::Storage(_) => ErrorCode::Storage,
            BundleError::Internal(_) => ErrorCode::Internal,
        }
    }
}
