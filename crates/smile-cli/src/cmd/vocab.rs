//! Implementation of `smile-check vocab <VOCABULARY> <VALUE>`.
//!
//! Prints the canonical display string when the value belongs to the
//! vocabulary.
//!
//! Exit codes:
//! - 0 = supported value
//! - 1 = empty or unsupported value
use std::io::Write as _;

use smile_core::{Vocabulary, validate};

use crate::error::CliError;

/// Runs the `vocab` command.
///
/// # Errors
///
/// - [`CliError::UnsupportedValue`] when `value` is not in the vocabulary.
/// - [`CliError::IoError`] when stdout cannot be written.
pub fn run(vocabulary: Vocabulary, value: &str) -> Result<(), CliError> {
    let canonical = validate(vocabulary, value).map_err(|e| CliError::UnsupportedValue {
        detail: e.to_string(),
    })?;
    tracing::debug!(%vocabulary, value = canonical, "value is supported");
    writeln!(std::io::stdout().lock(), "{canonical}").map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}
