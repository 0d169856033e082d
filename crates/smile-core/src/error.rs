/// Error types for the consistency comparator.
///
/// Only malformed input and misconfiguration are errors. A legitimate content
/// difference between two documents is reported as a `false` verdict, never
/// through this type.
use std::fmt;

/// Which of the two compared documents an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The original ("before") document.
    Reference,
    /// The republished ("after") document.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Target => f.write_str("target"),
        }
    }
}

/// Fatal failures surfaced by the comparator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparatorError {
    // --- parse family ---
    /// A document is not syntactically valid JSON.
    InvalidJson {
        /// The document that failed to parse.
        side: Side,
        /// Message from the JSON parser, including line and column.
        detail: String,
    },

    /// A document parsed, but a node has the wrong JSON type for its role
    /// (e.g. `samples` is not an array, or a sample is not an object).
    UnexpectedShape {
        /// The document containing the node.
        side: Side,
        /// Dotted path to the node, rooted at `$`.
        path: String,
        /// The JSON type the comparator requires at `path`.
        expected: &'static str,
        /// The JSON type actually found.
        found: &'static str,
    },

    // --- configuration family ---
    /// A comparison mode token is not one of `new`, `igo`, `dashboard`,
    /// `generic`.
    UnknownMode(String),

    /// A field name in an ignored-field or allow-list is empty or contains
    /// whitespace.
    MalformedFieldName(String),
}

impl ComparatorError {
    /// Returns `true` for errors caused by the input documents.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::InvalidJson { .. } | Self::UnexpectedShape { .. })
    }

    /// Returns `true` for errors caused by the comparator configuration.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::UnknownMode(_) | Self::MalformedFieldName(_))
    }
}

impl fmt::Display for ComparatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson { side, detail } => {
                write!(f, "{side} document is not valid JSON: {detail}")
            }
            Self::UnexpectedShape {
                side,
                path,
                expected,
                found,
            } => write!(
                f,
                "{side} document has unexpected shape at {path}: expected {expected}, found {found}"
            ),
            Self::UnknownMode(token) => write!(
                f,
                "unknown comparison mode {token:?} (expected one of: new, igo, dashboard, generic)"
            ),
            Self::MalformedFieldName(name) => write!(
                f,
                "malformed field name {name:?}: names must be non-empty and contain no whitespace"
            ),
        }
    }
}

impl std::error::Error for ComparatorError {}
