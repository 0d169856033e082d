//! Integration tests: compare incoming and republished metadata fixtures.
//!
//! Each test reads a pair of JSON documents from `tests/fixtures/` and checks
//! the verdict in one or more comparison modes, in both argument orders.
#![allow(clippy::expect_used)]

use std::path::PathBuf;

use smile_core::{Comparator, ComparisonMode, compare};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .canonicalize()
        .expect("fixtures directory should exist")
}

fn read_fixture(name: &str) -> String {
    let path = fixtures_dir().join(name);
    std::fs::read_to_string(&path).expect("fixture file should be readable")
}

/// Compares two fixtures both ways and asserts the verdict is the same.
fn verdict(reference: &str, target: &str, mode: ComparisonMode) -> bool {
    let a = read_fixture(reference);
    let b = read_fixture(target);
    let forward = compare(&a, &b, None, mode).expect("fixtures are well-formed");
    let backward = compare(&b, &a, None, mode).expect("fixtures are well-formed");
    assert_eq!(
        forward, backward,
        "{reference} vs {target} ({mode}) is not symmetric"
    );
    forward
}

#[test]
fn published_request_matches_incoming_request() {
    for mode in [ComparisonMode::New, ComparisonMode::Igo, ComparisonMode::Dashboard] {
        assert!(
            verdict("incoming_request_2t2n.json", "published_request_2t2n.json", mode),
            "mode {mode}"
        );
    }
}

#[test]
fn generic_mode_sees_aliases_added_on_publish() {
    assert!(!verdict(
        "incoming_request_2t2n.json",
        "published_request_2t2n.json",
        ComparisonMode::Generic
    ));
}

#[test]
fn populated_field_published_as_null_is_inconsistent() {
    assert!(!verdict(
        "incoming_request_2t2n.json",
        "published_request_null_values.json",
        ComparisonMode::New
    ));
}

#[test]
fn null_and_empty_representations_are_interchangeable() {
    assert!(verdict(
        "incoming_request_null_or_empty.json",
        "published_request_null_or_empty.json",
        ComparisonMode::New
    ));
}

#[test]
fn library_and_run_updates_are_detected() {
    for mode in [ComparisonMode::New, ComparisonMode::Igo] {
        assert!(
            !verdict(
                "published_request_lib_updates.json",
                "published_request_2t2n.json",
                mode
            ),
            "mode {mode}"
        );
    }
}

#[test]
fn non_lims_updates_pass_the_igo_check_only() {
    let (a, b) = (
        "published_request_invalid_updates.json",
        "published_request_2t2n.json",
    );
    assert!(verdict(a, b, ComparisonMode::Igo));
    assert!(!verdict(a, b, ComparisonMode::New));
}

#[test]
fn sample_with_lims_updates_fails_the_igo_check() {
    assert!(!verdict(
        "sample_pre_update.json",
        "sample_lims_updates.json",
        ComparisonMode::Igo
    ));
}

#[test]
fn sample_with_non_lims_updates_passes_the_igo_check() {
    let (a, b) = ("sample_pre_update.json", "sample_non_lims_updates.json");
    assert!(verdict(a, b, ComparisonMode::Igo));
    assert!(!verdict(a, b, ComparisonMode::New));
}

#[test]
fn reordered_runs_are_consistent_in_every_mode() {
    for mode in ComparisonMode::ALL {
        assert!(
            verdict("sample_pre_update.json", "sample_runs_reordered.json", mode),
            "mode {mode}"
        );
    }
}

#[test]
fn sample_status_is_compared() {
    let incoming = "incoming_request_sample_status.json";
    assert!(verdict(
        incoming,
        "published_request_sample_status.json",
        ComparisonMode::New
    ));
    assert!(!verdict(
        incoming,
        "published_request_invalid_sample_status.json",
        ComparisonMode::New
    ));
    assert!(!verdict(
        incoming,
        "published_request_missing_sample_status.json",
        ComparisonMode::New
    ));
}

#[test]
fn every_fixture_is_consistent_with_itself() {
    let comparator = Comparator::default();
    let entries = std::fs::read_dir(fixtures_dir()).expect("fixtures directory is readable");
    let mut checked = 0;
    for entry in entries {
        let path = entry.expect("directory entry").path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let text = std::fs::read_to_string(&path).expect("fixture file should be readable");
        let reformatted = serde_json::to_string(
            &serde_json::from_str::<serde_json::Value>(&text).expect("fixture is JSON"),
        )
        .expect("serializable");
        for mode in ComparisonMode::ALL {
            assert_eq!(
                comparator.compare(&text, &reformatted, None, mode),
                Ok(true),
                "{} ({mode})",
                path.display()
            );
        }
        checked += 1;
    }
    assert!(checked >= 10, "expected the fixture set, found {checked} files");
}
