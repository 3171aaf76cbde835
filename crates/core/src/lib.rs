//! Core types for document bundles
//!
//! This crate defines the document model shared by the bundle loader and the
//! stores it commits into:
//! - DocumentKey: slash-separated document path
//! - SnapshotVersion: read time of a document
//! - Document / NoDocument / MaybeDocument: live documents and tombstones
//! - BundleError: error type for the whole workspace

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod key;
pub mod version;

pub use document::{Document, DocumentKeySet, DocumentMap, MaybeDocument, NoDocument, ObjectValue};
pub use error::{BundleError, BundleResult, ErrorCode};
pub use key::DocumentKey;
pub use version::SnapshotVersion;
