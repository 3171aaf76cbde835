//! End-to-end loader scenarios
//!
//! Drives a `BundleLoader` over complete element sequences and checks the
//! emitted progress and what reaches the persistence layer.

use docbundle_bundle::{
    BundleCallback, BundleDocument, BundleElement, BundleLoader, BundleMetadata,
    BundledDocumentMetadata, BundledQuery, LoadBundleTaskProgress, NamedQuery, SizedElement,
    TaskState,
};
use docbundle_core::{
    BundleError, BundleResult, Document, DocumentKey, DocumentKeySet, DocumentMap, SnapshotVersion,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Keeps everything it is handed
#[derive(Default)]
struct CapturingStore {
    documents: Mutex<DocumentMap>,
    queries: Mutex<BTreeMap<String, DocumentKeySet>>,
    bundles: Mutex<Vec<BundleMetadata>>,
}

impl BundleCallback for CapturingStore {
    fn apply_bundled_documents(
        &self,
        documents: DocumentMap,
        _bundle_id: &str,
    ) -> BundleResult<DocumentMap> {
        self.documents.lock().extend(documents.clone());
        Ok(documents)
    }

    fn save_named_query(
        &self,
        query: &NamedQuery,
        matching_keys: &DocumentKeySet,
    ) -> BundleResult<()> {
        self.queries
            .lock()
            .insert(query.query_name.clone(), matching_keys.clone());
        Ok(())
    }

    fn save_bundle(&self, metadata: &BundleMetadata) -> BundleResult<()> {
        self.bundles.lock().push(metadata.clone());
        Ok(())
    }
}

fn key(path: &str) -> DocumentKey {
    DocumentKey::from_path(path).unwrap()
}

fn metadata(total_documents: u32, total_bytes: u64) -> BundleMetadata {
    BundleMetadata {
        bundle_id: "scenario".to_string(),
        version: 1,
        create_time: SnapshotVersion::from_secs(1_000),
        total_documents,
        total_bytes,
    }
}

fn query(name: &str) -> BundleElement {
    BundleElement::NamedQuery(NamedQuery {
        query_name: name.to_string(),
        bundled_query: BundledQuery {
            parent: "projects/p/databases/d/documents".to_string(),
            structured_query: serde_json::json!({ "from": [{ "collectionId": "coll" }] }),
            limit_type: Default::default(),
        },
        read_time: SnapshotVersion::from_secs(999),
    })
}

fn doc_metadata(path: &str, exists: bool, queries: &[&str]) -> BundleElement {
    BundleElement::DocumentMetadata(BundledDocumentMetadata {
        key: key(path),
        read_time: SnapshotVersion::from_secs(999),
        exists,
        queries: queries.iter().map(|q| q.to_string()).collect(),
    })
}

fn document(path: &str) -> BundleElement {
    let mut data = serde_json::Map::new();
    data.insert("path".to_string(), serde_json::json!(path));
    BundleElement::Document(BundleDocument {
        document: Document::new(key(path), SnapshotVersion::from_secs(900), data),
    })
}

fn run(
    loader: &mut BundleLoader,
    elements: Vec<SizedElement>,
) -> Vec<(usize, LoadBundleTaskProgress)> {
    elements
        .into_iter()
        .enumerate()
        .filter_map(|(i, sized)| {
            loader
                .add_element(sized.element, sized.byte_size)
                .unwrap()
                .map(|progress| (i + 1, progress))
        })
        .collect()
}

#[test]
fn test_query_document_and_tombstone() {
    let store = Arc::new(CapturingStore::default());
    let mut loader = BundleLoader::new(metadata(2, 100), store.clone());

    let progress = run(
        &mut loader,
        vec![
            SizedElement::new(query("Q"), 20),
            SizedElement::new(doc_metadata("coll/k1", true, &["Q"]), 10),
            SizedElement::new(document("coll/k1"), 40),
            SizedElement::new(doc_metadata("coll/k2", false, &[]), 5),
        ],
    );

    // Progress after element 3 and element 4 only
    assert_eq!(progress.len(), 2);
    assert_eq!(progress[0].0, 3);
    assert_eq!(
        progress[0].1,
        LoadBundleTaskProgress::new(1, 2, 70, 100, TaskState::Running)
    );
    assert_eq!(progress[1].0, 4);
    assert_eq!(
        progress[1].1,
        LoadBundleTaskProgress::new(2, 2, 75, 100, TaskState::Running)
    );

    let changes = loader.apply_changes().unwrap();
    assert_eq!(changes.len(), 2);
    assert!(!changes[&key("coll/k1")].is_tombstone());
    assert!(changes[&key("coll/k2")].is_tombstone());

    let queries = store.queries.lock();
    assert_eq!(queries.len(), 1);
    assert_eq!(
        queries["Q"],
        [key("coll/k1")].into_iter().collect::<DocumentKeySet>()
    );
    assert_eq!(store.bundles.lock().len(), 1);
    assert_eq!(store.documents.lock().len(), 2);
}

#[test]
fn test_query_mapping_across_documents() {
    let store = Arc::new(CapturingStore::default());
    let mut loader = BundleLoader::new(metadata(3, 0), store.clone());

    run(
        &mut loader,
        vec![
            SizedElement::new(query("A"), 0),
            SizedElement::new(query("B"), 0),
            SizedElement::new(doc_metadata("coll/k1", true, &["A"]), 0),
            SizedElement::new(document("coll/k1"), 0),
            SizedElement::new(doc_metadata("coll/k2", true, &["A", "B"]), 0),
            SizedElement::new(document("coll/k2"), 0),
            SizedElement::new(doc_metadata("coll/k3", false, &[]), 0),
        ],
    );
    loader.apply_changes().unwrap();

    let queries = store.queries.lock();
    assert_eq!(
        queries["A"],
        [key("coll/k1"), key("coll/k2")]
            .into_iter()
            .collect::<DocumentKeySet>()
    );
    assert_eq!(
        queries["B"],
        [key("coll/k2")].into_iter().collect::<DocumentKeySet>()
    );
}

#[test]
fn test_truncated_stream_is_not_committed() {
    let store = Arc::new(CapturingStore::default());
    let mut loader = BundleLoader::new(metadata(2, 100), store.clone());

    run(
        &mut loader,
        vec![
            SizedElement::new(doc_metadata("coll/k1", false, &[]), 5),
            SizedElement::new(doc_metadata("coll/k2", true, &[]), 5),
        ],
    );

    let err = loader.apply_changes().unwrap_err();
    assert!(matches!(
        err,
        BundleError::UnterminatedDocument { ref key } if key.to_string() == "coll/k2"
    ));
    assert!(store.documents.lock().is_empty());
    assert!(store.bundles.lock().is_empty());
}
