#![allow(clippy::expect_used)]

mod sample_tests;

use serde_json::Value;

use super::{ComparisonMode, FieldSet, compare};

/// Runs a comparison that is expected to succeed and returns the verdict.
pub(crate) fn check(reference: &Value, target: &Value, mode: ComparisonMode) -> bool {
    compare(&reference.to_string(), &target.to_string(), None, mode).expect("well-formed input")
}

/// [`check`] with an explicit ignored-field list.
pub(crate) fn check_ignoring(
    reference: &Value,
    target: &Value,
    ignored: &[&str],
    mode: ComparisonMode,
) -> bool {
    let ignored = FieldSet::try_from_names(ignored).expect("valid field names");
    compare(
        &reference.to_string(),
        &target.to_string(),
        Some(&ignored),
        mode,
    )
    .expect("well-formed input")
}

/// A request carrying two fully populated samples.
pub(crate) fn full_request() -> Value {
    serde_json::json!({
        "requestId": "09443_AA",
        "projectId": "09443",
        "recipe": "IMPACT505",
        "investigatorName": "Jane Doe",
        "isCmoRequest": true,
        "importDate": "2024-03-01",
        "smileRequestId": "f5a1b2",
        "pooledNormals": ["FROZENPOOLEDNORMAL_1"],
        "samples": [
            {
                "igoId": "09443_AA_1",
                "cmoSampleName": "C-ABC123-P001-d",
                "cmoPatientId": "C-ABC123",
                "cmoSampleClass": "Primary",
                "specimenType": "Biopsy",
                "baitSet": "IMPACT505_BAITS",
                "tumorOrNormal": "Tumor",
                "comments": null,
                "sampleAliases": [{"namespace": "igoId", "value": "09443_AA_1"}],
                "qcReports": [
                    {"qcReportType": "LIBRARY", "IGORecommendation": "Passed", "comments": ""},
                    {"qcReportType": "DNA", "IGORecommendation": "Try", "comments": "low yield"}
                ],
                "status": {"validationStatus": true, "validationReport": "{}"},
                "libraries": [
                    {
                        "libraryIgoId": "09443_AA_1_1_1",
                        "libraryVolume": 35.0,
                        "libraryConcentrationNgul": 44.2,
                        "runs": [
                            {"runId": "PITT_0439", "flowCellId": "HFTCNBBXY", "readLength": "101/8/8/101"},
                            {"runId": "PITT_0440", "flowCellId": "HFTCNBBXZ", "readLength": "101/8/8/101"}
                        ]
                    }
                ]
            },
            {
                "igoId": "09443_AA_2",
                "cmoPatientId": "C-ABC123",
                "cmoSampleClass": "Normal",
                "baitSet": "IMPACT505_BAITS",
                "tumorOrNormal": "Normal",
                "libraries": []
            }
        ]
    })
}
