//! Bundle load driver
//!
//! Runs one loading session from start to finish: checks whether the bundle
//! was already loaded, feeds every parsed element to a [`BundleLoader`],
//! forwards progress to an observer and commits. The observer always sees a
//! terminal snapshot last, `Success` or `Error`.

use crate::config::BundleConfig;
use crate::store::MemoryBundleStore;
use docbundle_bundle::{
    BundleCallback, BundleElement, BundleLoader, BundleMetadata, LoadBundleTaskProgress,
    SizedElement, TaskState,
};
use docbundle_core::{BundleError, BundleResult, DocumentMap};
use std::sync::Arc;
use tracing::{info, warn};

/// Persistence layer that can tell whether a bundle was already loaded
pub trait BundleCache: BundleCallback {
    /// True when the store holds this bundle at the same or a newer create time
    fn has_newer_bundle(&self, metadata: &BundleMetadata) -> bool;
}

impl BundleCache for MemoryBundleStore {
    fn has_newer_bundle(&self, metadata: &BundleMetadata) -> bool {
        MemoryBundleStore::has_newer_bundle(self, metadata)
    }
}

/// Result of a successful load
#[derive(Debug, Clone)]
pub struct LoadBundleOutcome {
    /// Final progress, always `Success`
    pub progress: LoadBundleTaskProgress,
    /// Changes produced by the commit; empty when the bundle was skipped
    pub changes: DocumentMap,
    /// True when the bundle was already loaded and nothing was applied
    pub skipped: bool,
}

/// Load a bundle into `store`
///
/// `elements` is the parser output following the bundle summary; a parse
/// error ends the session like a loader error does.
///
/// # Errors
///
/// Returns the first parser, loader or persistence error. The observer has
/// received an `Error` snapshot by then.
pub fn load_bundle<S, I, F>(
    store: &Arc<S>,
    config: &BundleConfig,
    metadata: BundleMetadata,
    elements: I,
    mut observer: F,
) -> BundleResult<LoadBundleOutcome>
where
    S: BundleCache + 'static,
    I: IntoIterator<Item = BundleResult<SizedElement>>,
    F: FnMut(&LoadBundleTaskProgress),
{
    if config.skip_loaded_bundles && store.has_newer_bundle(&metadata) {
        info!(bundle_id = %metadata.bundle_id, "Bundle already loaded, skipping");
        let progress = LoadBundleTaskProgress::success(&metadata);
        observer(&progress);
        return Ok(LoadBundleOutcome {
            progress,
            changes: DocumentMap::new(),
            skipped: true,
        });
    }

    info!(
        bundle_id = %metadata.bundle_id,
        total_documents = metadata.total_documents,
        total_bytes = metadata.total_bytes,
        "Loading bundle"
    );

    let mut last_progress = LoadBundleTaskProgress::initial(&metadata);
    if config.report_initial_progress {
        observer(&last_progress);
    }

    let callback: Arc<dyn BundleCallback> = store.clone();
    let loader = BundleLoader::new(metadata.clone(), callback);

    match run_session(loader, elements, &mut last_progress, &mut observer) {
        Ok(changes) => {
            let progress = LoadBundleTaskProgress::success(&metadata);
            observer(&progress);
            info!(bundle_id = %metadata.bundle_id, changes = changes.len(), "Bundle loaded");
            Ok(LoadBundleOutcome {
                progress,
                changes,
                skipped: false,
            })
        }
        Err(e) => {
            warn!(bundle_id = %metadata.bundle_id, error = %e, "Bundle load failed");
            observer(&last_progress.with_state(TaskState::Error));
            Err(e)
        }
    }
}

fn run_session<I, F>(
    mut loader: BundleLoader,
    elements: I,
    last_progress: &mut LoadBundleTaskProgress,
    observer: &mut F,
) -> BundleResult<DocumentMap>
where
    I: IntoIterator<Item = BundleResult<SizedElement>>,
    F: FnMut(&LoadBundleTaskProgress),
{
    for sized in elements {
        let sized = sized?;
        // The loader treats a summary as a caller bug; here it is bad input
        if let BundleElement::Metadata(ref extra) = sized.element {
            return Err(BundleError::invalid_input(format!(
                "unexpected bundle metadata element for bundle '{}'",
                extra.bundle_id
            )));
        }
        let progress = loader.add_element(sized.element, sized.byte_size)?;
        // Elements that complete no document still advance the byte count
        last_progress.bytes_loaded = loader.bytes_loaded();
        if let Some(progress) = progress {
            *last_progress = progress;
            observer(&progress);
        }
    }
    loader.apply_changes()
}
