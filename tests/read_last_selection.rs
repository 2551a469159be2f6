//! Read-path selection semantics
//!
//! `read_last` must pick the newest candidate strictly below the bound,
//! reconcile legacy-tagged versions, and fail descriptively when nothing
//! qualifies — all against a catalog whose listings it does not control.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use verbatch::batch::{BatchId, DurationBatcher};
use verbatch::catalog::{CatalogResult, MetadataCatalog};
use verbatch::execution::{ExecutionContext, ExecutionMode};
use verbatch::resolver::Version;
use verbatch::storage::MemoryBackend;
use verbatch::store::{IdentityCodec, NaturalOrder, ReadError, VersionedBatchStore};

const PATH: &str = "events/last";
const WINDOW: i64 = 100;

type Backend = MemoryBackend<String, u64>;
type Store = VersionedBatchStore<String, u64, String, u64>;

fn store_over(backend: &Backend) -> Store {
    store_with_catalog(backend, Arc::new(backend.clone()))
}

fn store_with_catalog(backend: &Backend, catalog: Arc<dyn MetadataCatalog>) -> Store {
    Store::new(
        PATH,
        Arc::new(DurationBatcher::new(WINDOW)),
        catalog,
        Arc::new(backend.clone()),
        Arc::new(backend.clone()),
        Arc::new(IdentityCodec),
        Arc::new(NaturalOrder),
    )
}

/// Seeds a current-convention version that resolves to `batch`.
fn seed_batch(backend: &Backend, batch: i64, records: Vec<(String, u64)>) {
    let version = Version::new(((batch + 1) * WINDOW) as u64);
    backend.insert_tagged_version(PATH, version, None, records);
}

#[test]
fn picks_newest_candidate_strictly_below_bound() {
    let backend = Backend::new();
    for batch in [3, 5, 7] {
        seed_batch(&backend, batch, vec![(format!("batch-{}", batch), batch as u64)]);
    }

    let (batch, producer) = store_over(&backend)
        .read_last(BatchId::new(6), ExecutionMode::Batch)
        .unwrap();
    assert_eq!(batch, BatchId::new(5));

    let records = producer.force(&ExecutionContext::batch()).unwrap();
    assert_eq!(records, vec![("batch-5".to_string(), 5)]);
}

#[test]
fn never_returns_a_batch_at_or_above_the_bound() {
    let backend = Backend::new();
    for batch in 0..10 {
        seed_batch(&backend, batch, vec![]);
    }
    let store = store_over(&backend);

    for bound in 1..12 {
        let (batch, _) = store
            .read_last(BatchId::new(bound), ExecutionMode::Batch)
            .unwrap();
        assert!(
            batch < BatchId::new(bound),
            "bound {} returned batch {}",
            bound,
            batch
        );
    }
}

#[test]
fn bound_at_oldest_candidate_reports_no_prior_version() {
    let backend = Backend::new();
    for batch in [3, 5, 7] {
        seed_batch(&backend, batch, vec![]);
    }

    let failures = store_over(&backend)
        .read_last(BatchId::new(3), ExecutionMode::Batch)
        .unwrap_err();
    assert!(failures
        .iter()
        .any(|f| matches!(f, ReadError::NoPriorVersion { .. })));

    let display = failures.to_string();
    assert!(display.contains(PATH));
    assert!(display.contains("batch 3"));
}

#[test]
fn legacy_tagged_version_is_reconciled_before_selection() {
    let backend = Backend::new();
    // Legacy writer completing batch 5: version numbered by batch 7's
    // start, tag naming 6 as the upper bound.
    backend.insert_tagged_version(
        PATH,
        Version::new(700),
        Some("6".to_string()),
        vec![("legacy".to_string(), 5)],
    );

    let store = store_over(&backend);

    // Under the current convention alone, version 700 would claim batch 6
    // and be excluded by this bound.
    let (batch, _) = store
        .read_last(BatchId::new(6), ExecutionMode::Batch)
        .unwrap();
    assert_eq!(batch, BatchId::new(5));
}

#[test]
fn unparsable_tag_falls_back_to_current_convention() {
    let tagged = Backend::new();
    tagged.insert_tagged_version(
        PATH,
        Version::new(700),
        Some("_SUCCESS".to_string()),
        vec![],
    );
    let untagged = Backend::new();
    untagged.insert_tagged_version(PATH, Version::new(700), None, vec![]);

    let from_tagged = store_over(&tagged)
        .read_last(BatchId::new(100), ExecutionMode::Batch)
        .unwrap()
        .0;
    let from_untagged = store_over(&untagged)
        .read_last(BatchId::new(100), ExecutionMode::Batch)
        .unwrap()
        .0;
    assert_eq!(from_tagged, from_untagged);
}

/// Catalog wrapper that counts listings, to prove the mode gate runs first.
struct CountingCatalog {
    inner: Backend,
    listings: AtomicUsize,
}

impl MetadataCatalog for CountingCatalog {
    fn list_versions(&self, path: &str) -> CatalogResult<BTreeSet<Version>> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        self.inner.list_versions(path)
    }

    fn version_tag(&self, path: &str, version: Version) -> CatalogResult<Option<String>> {
        self.inner.version_tag(path, version)
    }
}

#[test]
fn unsupported_mode_fails_before_any_listing() {
    let backend = Backend::new();
    seed_batch(&backend, 3, vec![]);

    let catalog = Arc::new(CountingCatalog {
        inner: backend.clone(),
        listings: AtomicUsize::new(0),
    });
    let store = store_with_catalog(&backend, catalog.clone());

    let failures = store
        .read_last(BatchId::new(10), ExecutionMode::Streaming)
        .unwrap_err();
    assert!(failures
        .iter()
        .any(|f| matches!(f, ReadError::UnsupportedMode { .. })));
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 0);

    // The same store lists exactly once for a supported mode.
    store
        .read_last(BatchId::new(10), ExecutionMode::Batch)
        .unwrap();
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 1);
}

#[test]
fn duplicate_batch_resolution_prefers_greater_version() {
    let backend = Backend::new();
    // Corrupt metadata: an untagged version 600 and a legacy-tagged version
    // 700 both resolve to batch 5. The greater raw version must win.
    backend.insert_tagged_version(PATH, Version::new(600), None, vec![("v600".to_string(), 0)]);
    backend.insert_tagged_version(
        PATH,
        Version::new(700),
        Some("6".to_string()),
        vec![("v700".to_string(), 0)],
    );

    let (batch, producer) = store_over(&backend)
        .read_last(BatchId::new(6), ExecutionMode::Batch)
        .unwrap();
    assert_eq!(batch, BatchId::new(5));

    let records = producer.force(&ExecutionContext::batch()).unwrap();
    assert_eq!(records, vec![("v700".to_string(), 0)]);
}
