use std::collections::{BTreeMap, BTreeSet};

use crate::value::{FieldValue, Record};

use super::filter::is_null_equivalent;

/// Identifier fields for samples, in lookup order: the canonical id first,
/// then the legacy LIMS id.
pub const SAMPLE_ID_FIELDS: &[&str] = &["primaryId", "igoId"];

/// How elements of two sub-record arrays are paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey<'k> {
    /// Pair by the value of the first listed field that is present and not
    /// null-equivalent.
    Identifier(&'k [&'k str]),
    /// Pair by the whole element's canonical rendering. Used for
    /// sub-records that carry no stable identifier; a pair only forms when
    /// both elements are equal.
    Content,
}

/// One reference element paired with one target element.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair<'a> {
    /// The key both elements share.
    pub key: String,
    /// Element from the reference array.
    pub reference: &'a Record,
    /// Element from the target array.
    pub target: &'a Record,
}

/// Result of pairing two sub-record arrays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordMatch<'a> {
    /// Paired elements in ascending key order.
    pub pairs: Vec<MatchedPair<'a>>,
    /// Reference elements whose key has no remaining counterpart in the target.
    pub unmatched_reference: Vec<(String, &'a Record)>,
    /// Target elements whose key has no remaining counterpart in the reference.
    pub unmatched_target: Vec<(String, &'a Record)>,
    /// Reference elements for which no key could be derived.
    pub unkeyed_reference: Vec<&'a Record>,
    /// Target elements for which no key could be derived.
    pub unkeyed_target: Vec<&'a Record>,
}

impl RecordMatch<'_> {
    /// Returns `true` if every keyed element found a counterpart.
    pub fn is_complete(&self) -> bool {
        self.unmatched_reference.is_empty() && self.unmatched_target.is_empty()
    }

    /// Number of elements on both sides for which no key could be derived.
    pub fn unkeyed(&self) -> usize {
        self.unkeyed_reference.len() + self.unkeyed_target.len()
    }
}

/// Renders a record deterministically (sorted keys, compact JSON).
pub(super) fn content_key(record: &Record) -> String {
    serde_json::to_string(record).unwrap_or_default()
}

/// Derives the matching key of `record`, or `None` when it has none.
pub fn record_key(record: &Record, key: MatchKey<'_>) -> Option<String> {
    match key {
        MatchKey::Identifier(fields) => fields
            .iter()
            .filter_map(|&field| record.get(field))
            .find(|value| !is_null_equivalent(value))
            .map(|value| match value {
                FieldValue::String(s) => s.clone(),
                other => other.canonical_key(),
            }),
        MatchKey::Content => Some(content_key(record)),
    }
}

/// Groups `records` by key. Members of a group are sorted by `order` so
/// duplicates pair up deterministically.
fn group_by_key<'a, K: Ord>(
    records: &'a [Record],
    key: MatchKey<'_>,
    order: &impl Fn(&Record) -> K,
    unkeyed: &mut Vec<&'a Record>,
) -> BTreeMap<String, Vec<&'a Record>> {
    let mut groups: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();
    for record in records {
        match record_key(record, key) {
            Some(k) => groups.entry(k).or_default().push(record),
            None => unkeyed.push(record),
        }
    }
    for members in groups.values_mut() {
        members.sort_by_cached_key(|r| order(*r));
    }
    groups
}

/// Pairs the elements of two sub-record arrays by key, independent of array
/// position.
///
/// Keys are visited in ascending lexicographic order, which gives both arrays
/// the same canonical ordering. A key present on only one side leaves its
/// elements unmatched; when both sides hold the same key more than once the
/// surplus on the longer side is unmatched. Elements without a key are
/// returned in [`RecordMatch::unkeyed_reference`] and
/// [`RecordMatch::unkeyed_target`] and take no part in pairing.
///
/// Elements sharing a key pair up in content order; see [`match_records_by`]
/// to order them by a projection instead.
pub fn match_records<'a>(
    reference: &'a [Record],
    target: &'a [Record],
    key: MatchKey<'_>,
) -> RecordMatch<'a> {
    match_records_by(reference, target, key, content_key)
}

/// [`match_records`] with elements that share a key paired in the order of
/// `order`. Callers that compare a projection of each element (e.g. after
/// dropping ignored fields) pass that projection, so fields outside it
/// cannot influence which duplicates are paired.
pub fn match_records_by<'a, K: Ord>(
    reference: &'a [Record],
    target: &'a [Record],
    key: MatchKey<'_>,
    order: impl Fn(&Record) -> K,
) -> RecordMatch<'a> {
    let mut result = RecordMatch::default();
    let ref_groups = group_by_key(reference, key, &order, &mut result.unkeyed_reference);
    let tar_groups = group_by_key(target, key, &order, &mut result.unkeyed_target);

    let all_keys: BTreeSet<&String> = ref_groups.keys().chain(tar_groups.keys()).collect();
    let empty: Vec<&Record> = Vec::new();

    for k in all_keys {
        let refs = ref_groups.get(k).unwrap_or(&empty);
        let tars = tar_groups.get(k).unwrap_or(&empty);
        for (r, t) in refs.iter().zip(tars.iter()) {
            result.pairs.push(MatchedPair {
                key: k.clone(),
                reference: *r,
                target: *t,
            });
        }
        for r in refs.iter().skip(tars.len()) {
            result.unmatched_reference.push((k.clone(), *r));
        }
        for t in tars.iter().skip(refs.len()) {
            result.unmatched_target.push((k.clone(), *t));
        }
    }
    result
}

/// Pairs two arrays element by element.
///
/// Returns `None` when the arrays differ in length; callers treat that as an
/// immediate mismatch.
pub fn match_positional<'a, T>(
    reference: &'a [T],
    target: &'a [T],
) -> Option<Vec<(&'a T, &'a T)>> {
    if reference.len() != target.len() {
        return None;
    }
    Some(reference.iter().zip(target.iter()).collect())
}
