use crate::value::{FieldValue, Record};

use super::policy::{FieldSet, ModePolicy};

/// Returns `true` if `value` carries no information: `null`, an empty
/// string, the literal string `"null"` in any case, or an empty array.
///
/// A field holding such a value is treated exactly like an absent field.
pub fn is_null_equivalent(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::String(s) => s.is_empty() || s.eq_ignore_ascii_case("null"),
        FieldValue::Array(items) => items.is_empty(),
        FieldValue::Bool(_)
        | FieldValue::Integer(_)
        | FieldValue::UnsignedInteger(_)
        | FieldValue::Float(_)
        | FieldValue::Object(_) => false,
    }
}

/// Returns a copy of `record` without the fields the comparison must not see.
///
/// A field is dropped when it is in `ignored`, when `allowed` is set and does
/// not contain it, or when its value is null-equivalent. Names in `ignored`
/// that the record lacks are simply skipped.
pub fn filter_record(record: &Record, ignored: &FieldSet, allowed: Option<&FieldSet>) -> Record {
    record
        .iter()
        .filter(|(name, value)| {
            !ignored.contains(name)
                && allowed.is_none_or(|allow| allow.contains(name))
                && !is_null_equivalent(value)
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// [`filter_record`] with both field sets taken from `policy`.
pub fn filter_with_policy(record: &Record, policy: &ModePolicy) -> Record {
    filter_record(record, &policy.ignored, policy.allowed.as_ref())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn record(text: &str) -> Record {
        match serde_json::from_str::<FieldValue>(text).expect("valid JSON") {
            FieldValue::Object(r) => r,
            other => unreachable!("fixture is not an object: {other:?}"),
        }
    }

    fn names(list: &[&str]) -> FieldSet {
        FieldSet::try_from_names(list).expect("valid names")
    }

    #[test]
    fn null_equivalents() {
        for text in ["null", r#""""#, r#""null""#, r#""NULL""#, r#""Null""#, "[]"] {
            let v: FieldValue = serde_json::from_str(text).expect("valid JSON");
            assert!(is_null_equivalent(&v), "{text} should be null-equivalent");
        }
    }

    #[test]
    fn non_empty_values_are_kept() {
        for text in [
            "0",
            "false",
            r#"" ""#,
            r#""nullable""#,
            "[null]",
            "{}",
            r#"{"a":null}"#,
        ] {
            let v: FieldValue = serde_json::from_str(text).expect("valid JSON");
            assert!(!is_null_equivalent(&v), "{text} should not be null-equivalent");
        }
    }

    #[test]
    fn removes_ignored_and_empty_fields() {
        let input = record(
            r#"{"primaryId":"S1","importDate":"2024-01-01","comments":null,
                "investigatorSampleId":"","tumorOrNormal":"Tumor","sampleAliases":[]}"#,
        );
        let out = filter_record(&input, &names(&["importDate"]), None);
        assert_eq!(
            out,
            record(r#"{"primaryId":"S1","tumorOrNormal":"Tumor"}"#)
        );
    }

    #[test]
    fn absent_ignored_names_are_not_an_error() {
        let input = record(r#"{"primaryId":"S1"}"#);
        let out = filter_record(&input, &names(&["doesNotExist", "importDate"]), None);
        assert_eq!(out, input);
    }

    #[test]
    fn allow_list_narrows_surviving_fields() {
        let input = record(r#"{"primaryId":"S1","baitSet":"B1","cmoPatientId":"C-1"}"#);
        let out = filter_record(
            &input,
            &FieldSet::default(),
            Some(&names(&["primaryId", "baitSet"])),
        );
        assert_eq!(out, record(r#"{"primaryId":"S1","baitSet":"B1"}"#));
    }

    #[test]
    fn allow_list_does_not_resurrect_ignored_fields() {
        let input = record(r#"{"genePanel":"IMPACT505","baitSet":"B1"}"#);
        let out = filter_record(
            &input,
            &names(&["genePanel"]),
            Some(&names(&["genePanel", "baitSet"])),
        );
        assert_eq!(out, record(r#"{"baitSet":"B1"}"#));
    }

    #[test]
    fn input_is_not_mutated() {
        let input = record(r#"{"primaryId":"S1","comments":null}"#);
        let before = input.clone();
        let _filtered = filter_record(&input, &FieldSet::default(), None);
        assert_eq!(input, before);
    }
}
