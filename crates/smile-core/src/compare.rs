/// Structural consistency comparator for republished metadata records.
///
/// Two JSON documents describing the same request or sample are reduced to
/// the fields that matter and compared for strict equality. The pipeline per
/// record is:
///
/// 1. **Standardize**: legacy property names are renamed to canonical names
///    using the rename table for the record kind ([`standardize_record`]).
/// 2. **Filter**: ignored fields, fields outside an allow-list, and
///    null-equivalent values are dropped ([`filter_record`]).
/// 3. **Match**: nested sub-record lists are paired across the two documents
///    by identifier, by content, or by position ([`match_records`],
///    [`match_positional`]).
/// 4. **Compare**: each surviving pair is checked for strict structural
///    equality ([`structurally_equal`]).
///
/// The verdict is a single boolean. Content differences never raise an
/// error; only malformed input and bad configuration do.
mod engine;
mod equality;
mod filter;
mod matching;
mod policy;
mod standardize;

#[cfg(test)]
mod tests;

pub use engine::{Comparator, SUB_RECORD_FIELDS, compare};
pub use equality::{first_divergence, raw_identical, records_equal, structurally_equal};
pub use filter::{filter_record, filter_with_policy, is_null_equivalent};
pub use matching::{
    MatchKey, MatchedPair, RecordMatch, SAMPLE_ID_FIELDS, match_positional, match_records,
    match_records_by, record_key,
};
pub use policy::{
    ComparatorConfig, ComparisonMode, DASHBOARD_EXTRA_IGNORED_FIELDS, DEFAULT_CONFIG,
    DEFAULT_IGNORED_FIELDS, FieldSet, GENERIC_IGNORED_FIELDS, LIMS_ALLOWED_FIELDS, ModePolicy,
    REQUEST_RENAMES, RecordKind, RenameTable, SAMPLE_RENAMES,
};
pub use standardize::standardize_record;
