/// Tab-separated verdict log written by `compare --report`.
///
/// One row per comparison. The header is written only when the file is
/// created, so repeated runs against the same file build up a single table.
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use crate::error::CliError;

/// Column names of the report.
pub const HEADER: [&str; 5] = ["reference", "target", "mode", "consistent", "traceparent"];

/// One comparison outcome.
#[derive(Debug, Clone)]
pub struct ReportRow<'a> {
    /// Label of the reference document (`-` for stdin).
    pub reference: &'a str,
    /// Label of the target document.
    pub target: &'a str,
    /// Mode token, e.g. `igo`.
    pub mode: &'a str,
    /// The verdict.
    pub consistent: bool,
    /// Trace context the comparison ran under.
    pub traceparent: &'a str,
}

impl ReportRow<'_> {
    fn to_line(&self) -> String {
        let consistent = if self.consistent { "true" } else { "false" };
        let cells = [
            self.reference,
            self.target,
            self.mode,
            consistent,
            self.traceparent,
        ];
        let mut line = cells.map(cell).join("\t");
        line.push('\n');
        line
    }
}

/// Tabs and line breaks inside a cell would break the row structure.
fn cell(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ")
}

/// Appends `row` to the report at `path`, creating it with a header line
/// when it does not exist yet.
///
/// # Errors
///
/// Returns [`CliError::IoError`] if the file cannot be opened or written.
pub fn append_row(path: &Path, row: &ReportRow<'_>) -> Result<(), CliError> {
    let io_err = |e: std::io::Error| CliError::IoError {
        source: path.display().to_string(),
        detail: e.to_string(),
    };

    let (mut file, created) = open_for_append(path).map_err(io_err)?;
    let mut text = String::new();
    if created {
        text.push_str(&HEADER.join("\t"));
        text.push('\n');
    }
    text.push_str(&row.to_line());
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.flush().map_err(io_err)
}

/// Opens `path` for appending; the flag is `true` when this call created it.
fn open_for_append(path: &Path) -> std::io::Result<(File, bool)> {
    match OpenOptions::new().append(true).create_new(true).open(path) {
        Ok(file) => Ok((file, true)),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            let file = OpenOptions::new().append(true).open(path)?;
            Ok((file, false))
        }
        Err(e) => Err(e),
    }
}
