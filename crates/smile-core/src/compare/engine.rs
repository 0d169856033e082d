use std::borrow::Cow;

use tracing::{debug, warn};

use crate::error::{ComparatorError, Side};
use crate::value::{FieldValue, Record, parse_document};

use super::equality::{first_divergence, raw_identical, records_equal, structurally_equal};
use super::filter::{filter_with_policy, is_null_equivalent};
use super::matching::{
    MatchKey, SAMPLE_ID_FIELDS, content_key, match_positional, match_records, match_records_by,
};
use super::policy::{
    ComparatorConfig, ComparisonMode, DEFAULT_CONFIG, FieldSet, ModePolicy, RecordKind,
};
use super::standardize::standardize_record;

/// Fields holding nested sub-records. They never take part in the flat
/// field comparison of the record that embeds them.
pub const SUB_RECORD_FIELDS: &[&str] = &["samples", "libraries", "qcReports", "status", "runs"];

/// Sub-record fields whose presence marks a document as sample-kind.
const SAMPLE_MARKER_FIELDS: &[&str] = &["libraries", "qcReports", "status"];

/// Sub-record fields of a sample compared as a whole (matched by content
/// when they hold a list).
const SAMPLE_CONTENT_FIELDS: &[&str] = &["qcReports", "status"];

/// Decides whether a republished metadata document is consistent with the
/// original.
///
/// Holds the field policies and rename tables for every mode. The struct is
/// immutable once built and may be shared across threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparator {
    config: ComparatorConfig,
}

impl Comparator {
    /// Creates a comparator using `config` in place of the built-in tables.
    pub fn new(config: ComparatorConfig) -> Self {
        Self { config }
    }

    /// The configuration this comparator applies.
    pub fn config(&self) -> &ComparatorConfig {
        &self.config
    }

    /// Compares two raw JSON documents.
    ///
    /// `ignored`, when given, replaces the mode's ignored-field set for the
    /// request-level and sample-level field comparisons; nested sub-records
    /// keep the mode's own set. Returns `Ok(false)` for any content
    /// difference the mode does not tolerate.
    ///
    /// # Errors
    ///
    /// Returns a parse-family [`ComparatorError`] when either document is not
    /// valid JSON, its root is not an object, or a `samples` or `libraries`
    /// node does not have the required shape.
    pub fn compare(
        &self,
        reference: &str,
        target: &str,
        ignored: Option<&FieldSet>,
        mode: ComparisonMode,
    ) -> Result<bool, ComparatorError> {
        compare_with(&self.config, reference, target, ignored, mode)
    }

    /// Compares two documents that have already been parsed.
    ///
    /// # Errors
    ///
    /// Returns [`ComparatorError::UnexpectedShape`] when a `samples` or
    /// `libraries` node does not have the required shape.
    pub fn compare_documents(
        &self,
        reference: &Record,
        target: &Record,
        ignored: Option<&FieldSet>,
        mode: ComparisonMode,
    ) -> Result<bool, ComparatorError> {
        check_shape(reference, Side::Reference)?;
        check_shape(target, Side::Target)?;
        Ok(Pass::new(&self.config, ignored, mode).documents(reference, target))
    }

    /// Default deny-list comparison ([`ComparisonMode::New`]).
    ///
    /// # Errors
    ///
    /// See [`Comparator::compare`].
    pub fn is_consistent(&self, reference: &str, target: &str) -> Result<bool, ComparatorError> {
        self.compare(reference, target, None, ComparisonMode::New)
    }

    /// LIMS allow-list comparison ([`ComparisonMode::Igo`]): only
    /// laboratory-originated fields are compared.
    ///
    /// # Errors
    ///
    /// See [`Comparator::compare`].
    pub fn is_consistent_by_igo_properties(
        &self,
        reference: &str,
        target: &str,
    ) -> Result<bool, ComparatorError> {
        self.compare(reference, target, None, ComparisonMode::Igo)
    }

    /// Comparison of records saved back through the dashboard.
    ///
    /// # Errors
    ///
    /// See [`Comparator::compare`].
    pub fn is_consistent_dashboard(
        &self,
        reference: &str,
        target: &str,
    ) -> Result<bool, ComparatorError> {
        self.compare(reference, target, None, ComparisonMode::Dashboard)
    }

    /// Comparison with the minimal `generic` deny-list.
    ///
    /// # Errors
    ///
    /// See [`Comparator::compare`].
    pub fn is_consistent_generic(
        &self,
        reference: &str,
        target: &str,
    ) -> Result<bool, ComparatorError> {
        self.compare(reference, target, None, ComparisonMode::Generic)
    }

    /// Default-mode comparison with an explicit ignored-field list.
    ///
    /// # Errors
    ///
    /// See [`Comparator::compare`].
    pub fn is_consistent_with_ignored(
        &self,
        reference: &str,
        target: &str,
        ignored: &FieldSet,
    ) -> Result<bool, ComparatorError> {
        self.compare(reference, target, Some(ignored), ComparisonMode::New)
    }
}

/// [`Comparator::compare`] with the built-in configuration.
///
/// # Errors
///
/// See [`Comparator::compare`].
pub fn compare(
    reference: &str,
    target: &str,
    ignored: Option<&FieldSet>,
    mode: ComparisonMode,
) -> Result<bool, ComparatorError> {
    compare_with(&DEFAULT_CONFIG, reference, target, ignored, mode)
}

fn compare_with(
    config: &ComparatorConfig,
    reference: &str,
    target: &str,
    ignored: Option<&FieldSet>,
    mode: ComparisonMode,
) -> Result<bool, ComparatorError> {
    let reference_doc = parse_document(reference, Side::Reference)?;
    let target_doc = parse_document(target, Side::Target)?;
    check_shape(&reference_doc, Side::Reference)?;
    check_shape(&target_doc, Side::Target)?;
    if raw_identical(reference, target) {
        return Ok(true);
    }
    Ok(Pass::new(config, ignored, mode).documents(&reference_doc, &target_doc))
}

// ---------------------------------------------------------------------------
// Shape validation
// ---------------------------------------------------------------------------

/// Returns the value of `field` unless it is absent or null-equivalent.
fn present<'a>(record: &'a Record, field: &str) -> Option<&'a FieldValue> {
    record.get(field).filter(|v| !is_null_equivalent(v))
}

fn shape_error(
    side: Side,
    path: String,
    expected: &'static str,
    found: &FieldValue,
) -> ComparatorError {
    ComparatorError::UnexpectedShape {
        side,
        path,
        expected,
        found: found.type_name(),
    }
}

/// Checks that `field` of `record`, if present, is an array of objects.
fn check_object_list(
    record: &Record,
    field: &str,
    path: &str,
    side: Side,
) -> Result<(), ComparatorError> {
    let Some(value) = present(record, field) else {
        return Ok(());
    };
    let list_path = format!("{path}.{field}");
    let items = value
        .as_array()
        .ok_or_else(|| shape_error(side, list_path.clone(), "array", value))?;
    for (i, item) in items.iter().enumerate() {
        if item.as_object().is_none() {
            return Err(shape_error(side, format!("{list_path}[{i}]"), "object", item));
        }
    }
    Ok(())
}

fn check_shape(document: &Record, side: Side) -> Result<(), ComparatorError> {
    check_object_list(document, "libraries", "$", side)?;
    check_object_list(document, "samples", "$", side)?;
    let samples = present(document, "samples")
        .and_then(FieldValue::as_array)
        .unwrap_or_default();
    for (i, sample) in samples.iter().enumerate() {
        if let Some(sample) = sample.as_object() {
            check_object_list(sample, "libraries", &format!("$.samples[{i}]"), side)?;
        }
    }
    Ok(())
}

/// The object elements of list field `field`; empty when the field is absent.
fn object_list(record: &Record, field: &str) -> Vec<Record> {
    present(record, field)
        .and_then(FieldValue::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(FieldValue::as_object)
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// One comparison: the resolved policies for a single call.
struct Pass<'c> {
    config: &'c ComparatorConfig,
    mode: ComparisonMode,
    /// Mode policy, used for nested sub-records.
    policy: &'c ModePolicy,
    /// Policy for request and sample fields; the mode policy with the
    /// caller's ignored list swapped in when one was given.
    record_policy: Cow<'c, ModePolicy>,
}

impl<'c> Pass<'c> {
    fn new(config: &'c ComparatorConfig, ignored: Option<&FieldSet>, mode: ComparisonMode) -> Self {
        let policy = config.policy(mode);
        let record_policy = match ignored {
            Some(set) => Cow::Owned(policy.with_ignored(set)),
            None => Cow::Borrowed(policy),
        };
        Self {
            config,
            mode,
            policy,
            record_policy,
        }
    }

    /// Every individual check runs even after a mismatch; the verdict is
    /// their conjunction.
    fn documents(&self, reference: &Record, target: &Record) -> bool {
        let _span = tracing::debug_span!("compare", mode = %self.mode).entered();

        let mut consistent = self.flat_fields("$", reference, target, RecordKind::Request);

        let sample_kind = SAMPLE_MARKER_FIELDS
            .iter()
            .any(|f| present(reference, f).is_some() || present(target, f).is_some());
        if sample_kind {
            consistent &= self.sample_sub_records("$", reference, target);
        }

        if present(reference, "samples").is_some() || present(target, "samples").is_some() {
            consistent &= self.samples(reference, target);
        }

        debug!(consistent, "comparison finished");
        consistent
    }

    /// Standardizes, filters and strictly compares the non-nested fields.
    fn flat_fields(
        &self,
        path: &str,
        reference: &Record,
        target: &Record,
        kind: RecordKind,
    ) -> bool {
        let renames = self.config.renames(kind);
        let reference = self.flatten(&standardize_record(reference, renames));
        let target = self.flatten(&standardize_record(target, renames));
        self.report(path, &reference, &target)
    }

    fn flatten(&self, record: &Record) -> Record {
        let mut out = filter_with_policy(record, &self.record_policy);
        for field in SUB_RECORD_FIELDS {
            out.remove(*field);
        }
        out
    }

    fn report(&self, path: &str, reference: &Record, target: &Record) -> bool {
        if records_equal(reference, target) {
            return true;
        }
        if let Some(divergence) = first_divergence(reference, target) {
            debug!(path, divergence = %divergence, mode = %self.mode, "fields differ");
        }
        false
    }

    /// Compares the `status`, `qcReports` and `libraries` of two sample-kind
    /// records.
    fn sample_sub_records(&self, path: &str, reference: &Record, target: &Record) -> bool {
        let mut consistent = true;
        for field in SAMPLE_CONTENT_FIELDS {
            consistent &= self.sub_record_field(path, field, reference, target);
        }
        consistent &= self.libraries(path, reference, target);
        consistent
    }

    fn sub_record_field(
        &self,
        path: &str,
        field: &str,
        reference: &Record,
        target: &Record,
    ) -> bool {
        match (present(reference, field), present(target, field)) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                let equal = self.sub_record_values(a, b);
                if !equal {
                    debug!(path, field, mode = %self.mode, "sub-records differ");
                }
                equal
            }
            (Some(_), None) | (None, Some(_)) => {
                debug!(path, field, "sub-record present on one side only");
                false
            }
        }
    }

    fn sub_record_values(&self, a: &FieldValue, b: &FieldValue) -> bool {
        match (a, b) {
            (FieldValue::Object(ao), FieldValue::Object(bo)) => records_equal(
                &filter_with_policy(ao, self.policy),
                &filter_with_policy(bo, self.policy),
            ),
            (FieldValue::Array(aa), FieldValue::Array(ba))
                if aa.iter().chain(ba.iter()).all(|v| v.as_object().is_some()) =>
            {
                let af = self.filter_objects(aa);
                let bf = self.filter_objects(ba);
                match_records(&af, &bf, MatchKey::Content).is_complete()
            }
            _ => structurally_equal(a, b),
        }
    }

    fn filter_objects(&self, items: &[FieldValue]) -> Vec<Record> {
        items
            .iter()
            .filter_map(FieldValue::as_object)
            .map(|r| filter_with_policy(r, self.policy))
            .collect()
    }

    /// Libraries pair up by position; each pair compares its own fields and
    /// then its `runs`.
    fn libraries(&self, path: &str, reference: &Record, target: &Record) -> bool {
        let (a, b) = match (present(reference, "libraries"), present(target, "libraries")) {
            (None, None) => return true,
            (Some(a), Some(b)) => (a, b),
            (Some(_), None) | (None, Some(_)) => {
                debug!(path, "libraries present on one side only");
                return false;
            }
        };
        let (Some(a), Some(b)) = (a.as_array(), b.as_array()) else {
            return structurally_equal(a, b);
        };
        let Some(pairs) = match_positional(a, b) else {
            debug!(path, reference = a.len(), target = b.len(), "library counts differ");
            return false;
        };

        let mut consistent = true;
        for (i, (ra, ta)) in pairs.into_iter().enumerate() {
            let lib_path = format!("{path}.libraries[{i}]");
            let (Some(ra), Some(ta)) = (ra.as_object(), ta.as_object()) else {
                consistent &= structurally_equal(ra, ta);
                continue;
            };
            let mut own_a = filter_with_policy(ra, self.policy);
            let mut own_b = filter_with_policy(ta, self.policy);
            own_a.remove("runs");
            own_b.remove("runs");
            consistent &= self.report(&lib_path, &own_a, &own_b);
            consistent &= self.sub_record_field(&lib_path, "runs", ra, ta);
        }
        consistent
    }

    /// Pairs samples by identifier and compares each pair, including its
    /// sub-records.
    fn samples(&self, reference: &Record, target: &Record) -> bool {
        let renames = self.config.renames(RecordKind::Sample);
        let standardize_all = |record: &Record| -> Vec<Record> {
            object_list(record, "samples")
                .iter()
                .map(|s| standardize_record(s, renames))
                .collect()
        };
        let reference_samples = standardize_all(reference);
        let target_samples = standardize_all(target);

        let matched = match_records_by(
            &reference_samples,
            &target_samples,
            MatchKey::Identifier(SAMPLE_ID_FIELDS),
            |s| self.sample_order_key(s),
        );

        let mut consistent = matched.is_complete();
        if matched.unkeyed() > 0 {
            warn!(
                reference = matched.unkeyed_reference.len(),
                target = matched.unkeyed_target.len(),
                "samples without primaryId or igoId are compared by content only"
            );
            consistent &= self.unkeyed_samples(&matched.unkeyed_reference, &matched.unkeyed_target);
        }
        for (id, _) in &matched.unmatched_reference {
            debug!(sample = %id, "sample missing from target");
        }
        for (id, _) in &matched.unmatched_target {
            debug!(sample = %id, "sample missing from reference");
        }

        for pair in &matched.pairs {
            let path = format!("$.samples[{}]", pair.key);
            let a = self.flatten(pair.reference);
            let b = self.flatten(pair.target);
            consistent &= self.report(&path, &a, &b);
            consistent &= self.sample_sub_records(&path, pair.reference, pair.target);
        }
        consistent
    }

    /// Orders samples sharing an identifier by what is actually compared:
    /// the filtered fields, then the policy-filtered sub-records.
    fn sample_order_key(&self, sample: &Record) -> (String, String) {
        let mut sub_records = filter_with_policy(sample, self.policy);
        sub_records.retain(|field, _| SUB_RECORD_FIELDS.contains(&field.as_str()));
        (content_key(&self.flatten(sample)), content_key(&sub_records))
    }

    /// Samples without an identifier cannot be paired, so the two sides must
    /// hold the same multiset of filtered fields.
    fn unkeyed_samples(&self, reference: &[&Record], target: &[&Record]) -> bool {
        let flatten_all = |samples: &[&Record]| -> Vec<Record> {
            samples.iter().map(|s| self.flatten(s)).collect()
        };
        let (a, b) = (flatten_all(reference), flatten_all(target));
        let matched = match_records(&a, &b, MatchKey::Content);
        if !matched.is_complete() {
            debug!(
                reference = matched.unmatched_reference.len(),
                target = matched.unmatched_target.len(),
                "samples without identifier differ"
            );
        }
        matched.is_complete()
    }
}
