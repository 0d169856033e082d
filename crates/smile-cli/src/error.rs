/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `smile-check` binary.
/// Every variant maps to a stable exit code via [`CliError::exit_code`]:
///
/// - Exit code **2**: the inputs could not be read, parsed or configured.
/// - Exit code **1**: the check ran to completion and failed (documents are
///   inconsistent, or a value is outside its vocabulary).
use std::fmt;
use std::path::PathBuf;

use smile_core::ComparatorError;

/// All error conditions that the `smile-check` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; `None` for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError {
        /// The underlying I/O error message.
        detail: String,
    },

    /// Any other I/O error, on input files, the report file or stdout.
    IoError {
        /// What was being read or written.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// Both documents were given as `-`.
    StdinUsedTwice,

    /// A document is not valid JSON or does not have the expected shape.
    ParseFailed {
        /// The comparator's description of the failure.
        detail: String,
    },

    /// The `--config` file, `--ignore-field` list or `--traceparent` value
    /// is invalid.
    InvalidConfiguration {
        /// What was wrong.
        detail: String,
    },

    // --- Exit code 1: logical failures ---
    /// The documents are not consistent under the selected mode.
    ///
    /// The verdict has already been printed; this variant exists so `main`
    /// can exit with code 1.
    Inconsistent,

    /// A value is not part of the requested vocabulary.
    UnsupportedValue {
        /// The vocabulary's description of the rejection.
        detail: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::StdinUsedTwice
            | Self::ParseFailed { .. }
            | Self::InvalidConfiguration { .. } => 2,

            Self::Inconsistent | Self::UnsupportedValue { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::StdinUsedTwice => {
                "error: only one of REFERENCE and TARGET may be read from stdin".to_owned()
            }
            Self::ParseFailed { detail } => format!("error: {detail}"),
            Self::InvalidConfiguration { detail } => {
                format!("error: invalid configuration: {detail}")
            }
            Self::Inconsistent => "error: documents are inconsistent".to_owned(),
            Self::UnsupportedValue { detail } => format!("error: {detail}"),
        }
    }
}

impl From<ComparatorError> for CliError {
    fn from(e: ComparatorError) -> Self {
        if e.is_configuration_error() {
            Self::InvalidConfiguration {
                detail: e.to_string(),
            }
        } else {
            Self::ParseFailed {
                detail: e.to_string(),
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}
