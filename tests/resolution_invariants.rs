//! Resolution invariants
//!
//! The batch/version mapping must round-trip under both numbering
//! conventions and stay strictly monotonic, or readers and writers stop
//! agreeing on what a version number means.

use std::sync::Arc;

use verbatch::batch::{BatchId, DurationBatcher};
use verbatch::resolver::{Version, VersionResolver};

fn resolver(window_millis: i64) -> VersionResolver {
    VersionResolver::new(Arc::new(DurationBatcher::new(window_millis)))
}

#[test]
fn current_convention_round_trips_for_every_batch() {
    let r = resolver(3_600_000);
    for raw in 0..100 {
        let batch = BatchId::new(raw);
        assert_eq!(
            r.version_to_batch(r.batch_to_version(batch)),
            batch,
            "round trip broke at batch {}",
            raw
        );
    }
}

#[test]
fn legacy_convention_round_trips_for_every_batch() {
    let r = resolver(3_600_000);
    for raw in 0..100 {
        let batch = BatchId::new(raw);
        let version = r.batch_to_version(batch.next());
        let tag = batch.next().to_string();
        assert_eq!(
            r.version_to_batch_compat(version, Some(&tag)),
            batch,
            "legacy round trip broke at batch {}",
            raw
        );
    }
}

#[test]
fn batch_to_version_is_strictly_monotonic() {
    let r = resolver(100);
    let versions: Vec<Version> = (0..50)
        .map(|raw| r.batch_to_version(BatchId::new(raw)))
        .collect();
    for pair in versions.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn unparsable_tag_resolves_like_no_tag() {
    let r = resolver(100);
    for raw_tag in ["_SUCCESS", "", "12.5", "batch-7", "0x10"] {
        for raw_version in [100u64, 250, 700] {
            let version = Version::new(raw_version);
            assert_eq!(
                r.version_to_batch_compat(version, Some(raw_tag)),
                r.version_to_batch_compat(version, None),
                "tag {:?} on {} should fall back to current convention",
                raw_tag,
                version
            );
        }
    }
}

#[test]
fn legacy_tag_shifts_resolution_by_one_batch() {
    // Version 700 resolves to batch 6 under the current convention. A
    // legacy tag "6" marks 6 as the upper bound, so resolution lands one
    // batch earlier.
    let r = resolver(100);
    let version = Version::new(700);
    assert_eq!(r.version_to_batch(version), BatchId::new(6));
    assert_eq!(
        r.version_to_batch_compat(version, Some("6")),
        BatchId::new(5)
    );
}

#[test]
fn window_size_does_not_affect_round_trips() {
    for window in [1, 7, 100, 86_400_000] {
        let r = resolver(window);
        for raw in [0, 1, 13, 977] {
            let batch = BatchId::new(raw);
            assert_eq!(r.version_to_batch(r.batch_to_version(batch)), batch);
        }
    }
}
