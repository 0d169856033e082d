use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::ComparatorError;

/// Fields dropped by every deny-list comparison: generated identifiers,
/// import timestamps, denormalized embedded collections and known
/// non-semantic aliases.
pub const DEFAULT_IGNORED_FIELDS: &[&str] = &[
    "smileRequestId",
    "smileSampleId",
    "smilePatientId",
    "requestJson",
    "samples",
    "importDate",
    "cmoSampleName",
    "sampleAliases",
    "datasource",
    "patientAliases",
    "genePanel",
    "additionalProperties",
];

/// Fields known to originate from the laboratory information system. In
/// `igo` mode nothing outside this list survives filtering.
pub const LIMS_ALLOWED_FIELDS: &[&str] = &[
    // request-level
    "deliveryDate",
    "isCmoRequest",
    "libraryType",
    "pooledNormals",
    "genePanel",
    "igoRequestId",
    "igoComplete",
    "igoSampleId",
    "strand",
    // sample-level
    "baitSet",
    "cfDNA2dBarcode",
    "recipe",
    "primaryId",
    "igoId",
    "barcodeId",
    "barcodeIndex",
    "captureConcentrationNm",
    "captureInputNg",
    "captureName",
    "dnaInputNg",
    "libraryConcentrationNgul",
    "libraryIgoId",
    "libraryVolume",
    "fastqs",
    "flowCellId",
    "flowCellLanes",
    "readLength",
    "runDate",
    "runId",
    "runMode",
    "IGORecommendation",
    "comments",
    "investigatorDecision",
    "qcReportType",
    "libraries",
    "qcReports",
    "status",
    "cmoSampleIdFields",
    "runs",
];

/// Bookkeeping fields the dashboard writes back on every save, on top of
/// [`DEFAULT_IGNORED_FIELDS`].
pub const DASHBOARD_EXTRA_IGNORED_FIELDS: &[&str] =
    &["revisable", "sampleCategory", "lastUpdated", "updatedBy"];

/// Fields dropped by the `generic` mode, which filters as little as possible.
pub const GENERIC_IGNORED_FIELDS: &[&str] = &[
    "smileRequestId",
    "smileSampleId",
    "smilePatientId",
    "requestJson",
    "samples",
    "importDate",
    "additionalProperties",
];

/// Legacy request-level property names and their canonical replacements.
pub const REQUEST_RENAMES: &[(&str, &str)] = &[
    ("projectId", "igoProjectId"),
    ("requestId", "igoRequestId"),
    ("recipe", "genePanel"),
];

/// Legacy sample-level property names and their canonical replacements.
pub const SAMPLE_RENAMES: &[(&str, &str)] = &[
    ("cmoSampleClass", "sampleType"),
    ("specimenType", "sampleClass"),
    ("oncoTreeCode", "oncotreeCode"),
    ("requestId", "igoRequestId"),
    ("igoId", "primaryId"),
];

/// Process-wide default configuration, built on first use and never mutated.
pub static DEFAULT_CONFIG: LazyLock<ComparatorConfig> = LazyLock::new(ComparatorConfig::default);

// ---------------------------------------------------------------------------
// ComparisonMode
// ---------------------------------------------------------------------------

/// Policy selector for a consistency check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonMode {
    /// Default deny-list comparison.
    #[default]
    New,
    /// LIMS allow-list comparison.
    Igo,
    /// Deny-list tuned for records round-tripped through the dashboard.
    Dashboard,
    /// Minimal deny-list for documents that are not request/sample metadata.
    Generic,
}

impl ComparisonMode {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 4] = [Self::New, Self::Igo, Self::Dashboard, Self::Generic];

    /// Returns the lowercase token for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Igo => "igo",
            Self::Dashboard => "dashboard",
            Self::Generic => "generic",
        }
    }
}

impl FromStr for ComparisonMode {
    type Err = ComparatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "igo" => Ok(Self::Igo),
            "dashboard" => Ok(Self::Dashboard),
            "generic" => Ok(Self::Generic),
            other => Err(ComparatorError::UnknownMode(other.to_owned())),
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RecordKind
// ---------------------------------------------------------------------------

/// Whether a record is a request-level container or a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Top-level request; may embed a `samples` list.
    Request,
    /// Sample metadata; may embed `libraries`, `qcReports` and `status`.
    Sample,
}

// ---------------------------------------------------------------------------
// FieldSet
// ---------------------------------------------------------------------------

/// A validated set of field names.
///
/// Every name is non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeSet<String>);

impl FieldSet {
    /// Builds a set from arbitrary names, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`ComparatorError::MalformedFieldName`] for the first empty
    /// name or name containing whitespace.
    pub fn try_from_names<I, S>(names: I) -> Result<Self, ComparatorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return Err(ComparatorError::MalformedFieldName(name.to_owned()));
            }
            set.insert(name.to_owned());
        }
        Ok(Self(set))
    }

    /// Parses a comma-separated list such as `"importDate, datasource"`.
    ///
    /// Whitespace around each entry is trimmed. A blank list yields an empty
    /// set; a blank entry between commas is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`ComparatorError::MalformedFieldName`] for a blank entry or an
    /// entry with interior whitespace.
    pub fn parse_list(list: &str) -> Result<Self, ComparatorError> {
        if list.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::try_from_names(list.split(',').map(str::trim))
    }

    /// Builds a set from the compiled-in tables. The tables hold literal
    /// identifiers, so no validation is needed.
    fn from_static(names: &[&str]) -> Self {
        Self(names.iter().map(|&n| n.to_owned()).collect())
    }

    /// Returns `true` if `name` is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of names in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no names.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the names in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns a new set holding the names of both sets.
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Self::try_from_names(names).map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RenameTable
// ---------------------------------------------------------------------------

/// Maps legacy property names to canonical names.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenameTable(BTreeMap<String, String>);

impl RenameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table with one more `legacy -> canonical` entry.
    #[must_use]
    pub fn with(mut self, legacy: &str, canonical: &str) -> Self {
        self.0.insert(legacy.to_owned(), canonical.to_owned());
        self
    }

    fn from_static(pairs: &[(&str, &str)]) -> Self {
        pairs
            .iter()
            .fold(Self::new(), |table, &(legacy, canonical)| {
                table.with(legacy, canonical)
            })
    }

    /// Returns the canonical name for `legacy`, if it has one.
    pub fn canonical_name(&self, legacy: &str) -> Option<&str> {
        self.0.get(legacy).map(String::as_str)
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ModePolicy / ComparatorConfig
// ---------------------------------------------------------------------------

/// The field policy a comparison mode resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePolicy {
    /// Fields always removed before comparison.
    pub ignored: FieldSet,
    /// When set, fields outside this list are removed as well, whatever
    /// their value.
    #[serde(default)]
    pub allowed: Option<FieldSet>,
}

impl ModePolicy {
    /// A deny-list-only policy.
    pub fn deny_list(ignored: FieldSet) -> Self {
        Self {
            ignored,
            allowed: None,
        }
    }

    /// A policy that narrows the surviving fields to `allowed`.
    pub fn allow_list(ignored: FieldSet, allowed: FieldSet) -> Self {
        Self {
            ignored,
            allowed: Some(allowed),
        }
    }

    /// Returns a copy of this policy whose ignored set is replaced by
    /// `ignored`; the allow-list is kept.
    #[must_use]
    pub fn with_ignored(&self, ignored: &FieldSet) -> Self {
        Self {
            ignored: ignored.clone(),
            allowed: self.allowed.clone(),
        }
    }
}

/// Field policies and rename tables used by the comparator.
///
/// Constructed once (usually via [`Default`] or from a JSON file) and passed
/// to a [`crate::compare::Comparator`]. Missing keys in a JSON config fall
/// back to the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorConfig {
    /// Policy for [`ComparisonMode::New`].
    pub new: ModePolicy,
    /// Policy for [`ComparisonMode::Igo`].
    pub igo: ModePolicy,
    /// Policy for [`ComparisonMode::Dashboard`].
    pub dashboard: ModePolicy,
    /// Policy for [`ComparisonMode::Generic`].
    pub generic: ModePolicy,
    /// Renames applied to request-level records.
    pub request_renames: RenameTable,
    /// Renames applied to sample-level records.
    pub sample_renames: RenameTable,
}

impl Default for ComparatorConfig {
    fn default() -> Self {
        let default_ignored = FieldSet::from_static(DEFAULT_IGNORED_FIELDS);
        let dashboard_ignored =
            default_ignored.union(&FieldSet::from_static(DASHBOARD_EXTRA_IGNORED_FIELDS));
        Self {
            new: ModePolicy::deny_list(default_ignored.clone()),
            igo: ModePolicy::allow_list(
                default_ignored,
                FieldSet::from_static(LIMS_ALLOWED_FIELDS),
            ),
            dashboard: ModePolicy::deny_list(dashboard_ignored),
            generic: ModePolicy::deny_list(FieldSet::from_static(GENERIC_IGNORED_FIELDS)),
            request_renames: RenameTable::from_static(REQUEST_RENAMES),
            sample_renames: RenameTable::from_static(SAMPLE_RENAMES),
        }
    }
}

impl ComparatorConfig {
    /// Resolves `mode` to its field policy.
    pub fn policy(&self, mode: ComparisonMode) -> &ModePolicy {
        match mode {
            ComparisonMode::New => &self.new,
            ComparisonMode::Igo => &self.igo,
            ComparisonMode::Dashboard => &self.dashboard,
            ComparisonMode::Generic => &self.generic,
        }
    }

    /// Returns the rename table for records of `kind`.
    pub fn renames(&self, kind: RecordKind) -> &RenameTable {
        match kind {
            RecordKind::Request => &self.request_renames,
            RecordKind::Sample => &self.sample_renames,
        }
    }
}
