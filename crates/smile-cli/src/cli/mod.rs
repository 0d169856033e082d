//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use smile_core::{ComparisonMode, Vocabulary};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for PathOrStdin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("-"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Comparison policy selected with `--mode`.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Mode {
    /// Deny-list comparison of request and sample metadata (default).
    New,
    /// Compare only fields owned by the LIMS.
    Igo,
    /// Deny-list tuned for records edited through the dashboard.
    Dashboard,
    /// Minimal deny-list for arbitrary JSON documents.
    Generic,
}

impl From<Mode> for ComparisonMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::New => ComparisonMode::New,
            Mode::Igo => ComparisonMode::Igo,
            Mode::Dashboard => ComparisonMode::Dashboard,
            Mode::Generic => ComparisonMode::Generic,
        }
    }
}

/// All top-level subcommands exposed by the `smile-check` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Check whether a republished document is consistent with its source.
    Compare {
        /// The document as originally received, or `-` for stdin.
        #[arg(value_name = "REFERENCE")]
        reference: PathOrStdin,
        /// The document as republished (cannot be `-` if REFERENCE is `-`).
        #[arg(value_name = "TARGET")]
        target: PathOrStdin,
        /// Comparison policy.
        #[arg(long, default_value = "new", value_enum)]
        mode: Mode,
        /// Ignore this field instead of the mode's ignored set (repeatable).
        #[arg(long, value_name = "FIELD")]
        ignore_field: Vec<String>,
        /// JSON file overriding the built-in field tables.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Append the verdict as a tab-separated row to this file.
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,
        /// W3C trace context to continue; a new trace is started otherwise.
        #[arg(long, env = "TRACEPARENT", value_name = "TRACEPARENT")]
        traceparent: Option<String>,
    },

    /// Check a value against a controlled vocabulary.
    Vocab {
        /// Vocabulary name, e.g. `sample-type` or `specimen-type`.
        #[arg(value_name = "VOCABULARY")]
        vocabulary: Vocabulary,
        /// The value to check (case-sensitive).
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },
}

/// Root CLI struct for the `smile-check` binary.
#[derive(Parser)]
#[command(
    name = "smile-check",
    version,
    about = "Consistency checks for republished laboratory metadata",
    long_about = "Compares request and sample metadata documents as received and as\n\
                  republished, and validates values against controlled vocabularies."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Log only errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log each mismatch with the path where the documents diverge
    /// (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `SMILE_MAX_FILE_SIZE` environment variable.
    /// Default: 67108864 (64 MB).
    #[arg(
        long,
        global = true,
        env = "SMILE_MAX_FILE_SIZE",
        default_value = "67108864"
    )]
    pub max_file_size: u64,
}
