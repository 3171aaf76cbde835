//! Load progress snapshots
//!
//! The loader emits a `Running` snapshot each time a document is completed.
//! Terminal `Success` / `Error` snapshots are assigned by whoever drives the
//! loader once `apply_changes` resolves.

use crate::types::BundleMetadata;
use serde::{Deserialize, Serialize};

/// State of a bundle load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Load failed
    Error,
    /// Load in progress
    Running,
    /// Load committed
    Success,
}

impl TaskState {
    /// True for `Error` and `Success`
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Running)
    }
}

/// Snapshot of a bundle load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBundleTaskProgress {
    /// Documents completed so far
    pub documents_loaded: u32,
    /// Documents declared by the bundle
    pub total_documents: u32,
    /// Bytes consumed so far
    pub bytes_loaded: u64,
    /// Bytes declared by the bundle
    pub total_bytes: u64,
    /// Load state
    pub state: TaskState,
}

impl LoadBundleTaskProgress {
    /// Create a snapshot
    pub fn new(
        documents_loaded: u32,
        total_documents: u32,
        bytes_loaded: u64,
        total_bytes: u64,
        state: TaskState,
    ) -> Self {
        Self {
            documents_loaded,
            total_documents,
            bytes_loaded,
            total_bytes,
            state,
        }
    }

    /// Zero progress at the start of a load
    pub fn initial(metadata: &BundleMetadata) -> Self {
        Self::new(
            0,
            metadata.total_documents,
            0,
            metadata.total_bytes,
            TaskState::Running,
        )
    }

    /// Full progress for a committed (or skipped) load
    pub fn success(metadata: &BundleMetadata) -> Self {
        Self::new(
            metadata.total_documents,
            metadata.total_documents,
            metadata.total_bytes,
            metadata.total_bytes,
            TaskState::Success,
        )
    }

    /// Same counters with a different state
    pub fn with_state(self, state: TaskState) -> Self {
        Self { state, ..self }
    }
}
