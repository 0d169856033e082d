use serde_json::{Value, json};

use super::{check, check_ignoring, full_request};
use crate::compare::{ComparisonMode, compare};
use crate::error::{ComparatorError, Side};

fn sample(libraries: Value) -> Value {
    json!({
        "primaryId": "S1",
        "baitSet": "IMPACT505_BAITS",
        "libraries": libraries
    })
}

fn library(id: &str, runs: Value) -> Value {
    json!({"libraryIgoId": id, "libraryVolume": 35.0, "runs": runs})
}

fn request_with(samples: Value) -> Value {
    json!({"igoRequestId": "R1", "samples": samples})
}

// ---------------------------------------------------------------------------
// Libraries
// ---------------------------------------------------------------------------

#[test]
fn extra_library_is_inconsistent() {
    let a = json!({"primaryId": "S1", "libraries": [{"libraryIgoId": "L1", "runs": []}]});
    let b = json!({"primaryId": "S1", "libraries": [
        {"libraryIgoId": "L1", "runs": []},
        {"libraryIgoId": "L2", "runs": []}
    ]});
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(!check(&b, &a, ComparisonMode::New));
}

#[test]
fn libraries_pair_by_position() {
    let a = sample(json!([library("L1", json!([])), library("L2", json!([]))]));
    let b = sample(json!([library("L2", json!([])), library("L1", json!([]))]));
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn library_field_difference_is_inconsistent() {
    let a = sample(json!([{"libraryIgoId": "L1", "libraryVolume": 35.0}]));
    let b = sample(json!([{"libraryIgoId": "L1", "libraryVolume": 30.0}]));
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(!check(&a, &b, ComparisonMode::Igo));
}

#[test]
fn run_order_does_not_matter() {
    let r1 = json!({"runId": "PITT_0439", "flowCellId": "A"});
    let r2 = json!({"runId": "PITT_0440", "flowCellId": "B"});
    let a = sample(json!([library("L1", json!([r1.clone(), r2.clone()]))]));
    let b = sample(json!([library("L1", json!([r2, r1]))]));
    assert!(check(&a, &b, ComparisonMode::New));
}

#[test]
fn run_difference_is_inconsistent() {
    let a = sample(json!([library("L1", json!([{"runId": "PITT_0439", "fastqs": ["a.fastq.gz"]}]))]));
    let b = sample(json!([library("L1", json!([{"runId": "PITT_0439", "fastqs": ["b.fastq.gz"]}]))]));
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn empty_runs_equal_absent_runs() {
    let a = sample(json!([library("L1", json!([]))]));
    let b = sample(json!([{"libraryIgoId": "L1", "libraryVolume": 35.0}]));
    assert!(check(&a, &b, ComparisonMode::New));
}

#[test]
fn runs_on_one_side_only_are_inconsistent() {
    let a = sample(json!([library("L1", json!([{"runId": "PITT_0439"}]))]));
    let b = sample(json!([{"libraryIgoId": "L1", "libraryVolume": 35.0}]));
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn libraries_must_be_a_list_of_objects() {
    let bad = json!({"primaryId": "S1", "libraries": {"libraryIgoId": "L1"}}).to_string();
    let err = compare(&bad, "{}", None, ComparisonMode::New).expect_err("object libraries");
    assert_eq!(
        err,
        ComparatorError::UnexpectedShape {
            side: Side::Reference,
            path: "$.libraries".to_owned(),
            expected: "array",
            found: "object",
        }
    );

    let nested = request_with(json!([{"primaryId": "S1", "libraries": ["L1"]}])).to_string();
    let err = compare("{}", &nested, None, ComparisonMode::New).expect_err("string library");
    assert_eq!(
        err,
        ComparatorError::UnexpectedShape {
            side: Side::Target,
            path: "$.samples[0].libraries[0]".to_owned(),
            expected: "object",
            found: "string",
        }
    );
}

// ---------------------------------------------------------------------------
// QC reports and status
// ---------------------------------------------------------------------------

#[test]
fn qc_report_order_does_not_matter() {
    let passed = json!({"qcReportType": "LIBRARY", "IGORecommendation": "Passed"});
    let tried = json!({"qcReportType": "DNA", "IGORecommendation": "Try"});
    let a = json!({"primaryId": "S1", "qcReports": [passed.clone(), tried.clone()]});
    let b = json!({"primaryId": "S1", "qcReports": [tried, passed]});
    assert!(check(&a, &b, ComparisonMode::New));
}

#[test]
fn qc_report_difference_is_inconsistent() {
    let a = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA", "investigatorDecision": "Continue"}]});
    let b = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA", "investigatorDecision": "Stop"}]});
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(!check(&a, &b, ComparisonMode::Igo));
}

#[test]
fn qc_report_null_fields_are_ignored() {
    let a = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA", "comments": null}]});
    let b = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA"}]});
    assert!(check(&a, &b, ComparisonMode::New));
}

#[test]
fn qc_reports_on_one_side_only_are_inconsistent() {
    let a = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA"}]});
    let b = json!({"primaryId": "S1", "qcReports": []});
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(!check(&b, &a, ComparisonMode::New));
}

#[test]
fn status_is_compared_as_an_object() {
    let a = json!({"primaryId": "S1", "status": {"validationStatus": true, "validationReport": "{}"}});
    let reordered = json!({"primaryId": "S1", "status": {"validationReport": "{}", "validationStatus": true}});
    let failed = json!({"primaryId": "S1", "status": {"validationStatus": false, "validationReport": "{}"}});
    assert!(check(&a, &reordered, ComparisonMode::New));
    assert!(!check(&a, &failed, ComparisonMode::New));
}

#[test]
fn igo_mode_ignores_status_fields_outside_the_allow_list() {
    let a = json!({"primaryId": "S1", "status": {"validationStatus": true}});
    let b = json!({"primaryId": "S1", "status": {"validationStatus": false}});
    assert!(check(&a, &b, ComparisonMode::Igo));
}

// ---------------------------------------------------------------------------
// Samples embedded in a request
// ---------------------------------------------------------------------------

#[test]
fn legacy_sample_names_are_standardized() {
    let a = request_with(json!([{"igoId": "S1", "cmoSampleClass": "Primary", "oncoTreeCode": "LUAD"}]));
    let b = request_with(json!([{"primaryId": "S1", "sampleType": "Primary", "oncotreeCode": "LUAD"}]));
    assert!(check(&a, &b, ComparisonMode::New));
}

#[test]
fn missing_sample_is_inconsistent() {
    let a = request_with(json!([{"primaryId": "S1"}, {"primaryId": "S2"}]));
    let b = request_with(json!([{"primaryId": "S1"}]));
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(!check(&b, &a, ComparisonMode::New));
}

#[test]
fn samples_on_one_side_only_are_inconsistent() {
    let a = request_with(json!([{"primaryId": "S1"}]));
    let b = json!({"igoRequestId": "R1"});
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn replaced_sample_is_inconsistent() {
    let a = request_with(json!([{"primaryId": "S1"}]));
    let b = request_with(json!([{"primaryId": "S9"}]));
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn sample_without_identifier_on_one_side_is_inconsistent() {
    let a = request_with(json!([{"primaryId": "S1"}, {"cmoPatientId": "P1", "baitSet": "B"}]));
    let b = request_with(json!([{"primaryId": "S1"}]));
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(!check(&b, &a, ComparisonMode::New));
}

#[test]
fn samples_without_identifier_compare_by_content() {
    let a = request_with(json!([{"cmoPatientId": "P1"}]));
    let b = request_with(json!([{"cmoPatientId": "P2"}]));
    assert!(!check(&a, &b, ComparisonMode::New));

    let c = request_with(json!([
        {"cmoPatientId": "P1", "importDate": "2021-01-01"},
        {"cmoPatientId": "P2"}
    ]));
    let d = request_with(json!([
        {"cmoPatientId": "P2", "comments": null},
        {"cmoPatientId": "P1", "importDate": "2024-06-30"}
    ]));
    assert!(check(&c, &d, ComparisonMode::New));
}

#[test]
fn duplicate_identifiers_pair_by_compared_fields() {
    let a = request_with(json!([
        {"primaryId": "S1", "x": 1, "importDate": "a"},
        {"primaryId": "S1", "x": 2, "importDate": "b"}
    ]));
    let b = request_with(json!([
        {"primaryId": "S1", "x": 1, "importDate": "z"},
        {"primaryId": "S1", "x": 2, "importDate": "c"}
    ]));
    for mode in [ComparisonMode::New, ComparisonMode::Dashboard, ComparisonMode::Generic] {
        assert!(check(&a, &b, mode), "mode {mode}");
        assert!(check(&b, &a, mode), "mode {mode}");
    }

    let c = request_with(json!([
        {"primaryId": "S1", "x": 1, "importDate": "a"},
        {"primaryId": "S1", "x": 3, "importDate": "b"}
    ]));
    assert!(!check(&a, &c, ComparisonMode::New));
}

#[test]
fn duplicate_identifiers_pair_by_sub_records() {
    let qc = |kind: &str| json!([{"qcReportType": kind, "IGORecommendation": "Passed"}]);
    let a = request_with(json!([
        {"primaryId": "S1", "qcReports": qc("DNA"), "smileSampleId": "a"},
        {"primaryId": "S1", "qcReports": qc("RNA"), "smileSampleId": "b"}
    ]));
    let b = request_with(json!([
        {"primaryId": "S1", "qcReports": qc("RNA"), "smileSampleId": "c"},
        {"primaryId": "S1", "qcReports": qc("DNA"), "smileSampleId": "d"}
    ]));
    assert!(check(&a, &b, ComparisonMode::New));
    assert!(check(&a, &b, ComparisonMode::Igo));
}

#[test]
fn sample_field_difference_is_inconsistent() {
    let a = request_with(json!([{"primaryId": "S1", "tumorOrNormal": "Tumor"}]));
    let b = request_with(json!([{"primaryId": "S1", "tumorOrNormal": "Normal"}]));
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn nested_sub_records_of_paired_samples_are_compared() {
    let a = request_with(json!([sample(json!([library("L1", json!([]))]))]));
    let b = request_with(json!([sample(json!([
        library("L1", json!([])),
        library("L2", json!([]))
    ]))]));
    assert!(!check(&a, &b, ComparisonMode::New));
}

#[test]
fn igo_mode_compares_only_lims_sample_fields() {
    let a = request_with(json!([{"primaryId": "S1", "baitSet": "B1", "cmoPatientId": "C-1"}]));
    let b = request_with(json!([{"primaryId": "S1", "baitSet": "B1", "cmoPatientId": "C-2"}]));
    assert!(check(&a, &b, ComparisonMode::Igo));
    assert!(!check(&a, &b, ComparisonMode::New));

    let c = request_with(json!([{"primaryId": "S1", "baitSet": "B2", "cmoPatientId": "C-1"}]));
    assert!(!check(&a, &c, ComparisonMode::Igo));
}

#[test]
fn explicit_ignored_list_applies_to_samples() {
    let a = request_with(json!([{"primaryId": "S1", "investigatorSampleId": "P-1"}]));
    let b = request_with(json!([{"primaryId": "S1", "investigatorSampleId": "P-2"}]));
    assert!(!check(&a, &b, ComparisonMode::New));
    assert!(check_ignoring(&a, &b, &["investigatorSampleId"], ComparisonMode::New));
}

#[test]
fn explicit_ignored_list_leaves_sub_records_on_mode_defaults() {
    let a = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA", "importDate": "2024-01-01"}]});
    let b = json!({"primaryId": "S1", "qcReports": [{"qcReportType": "DNA", "importDate": "2024-02-02"}]});
    assert!(check_ignoring(&a, &b, &["comments"], ComparisonMode::New));
}

#[test]
fn full_request_with_reordered_collections_is_consistent() {
    let a = full_request();
    let mut b = full_request();
    if let Some(samples) = b["samples"].as_array_mut() {
        samples.reverse();
    }
    if let Some(reports) = b["samples"][1]["qcReports"].as_array_mut() {
        reports.reverse();
    }
    if let Some(runs) = b["samples"][1]["libraries"][0]["runs"].as_array_mut() {
        runs.reverse();
    }
    b["samples"][1]["comments"] = json!("");
    for mode in ComparisonMode::ALL {
        assert!(check(&a, &b, mode), "mode {mode}");
    }
}

#[test]
fn full_request_with_changed_run_is_inconsistent() {
    let a = full_request();
    let mut b = full_request();
    b["samples"][0]["libraries"][0]["runs"][1]["flowCellId"] = json!("OTHER");
    for mode in ComparisonMode::ALL {
        assert!(!check(&a, &b, mode), "mode {mode}");
    }
}
