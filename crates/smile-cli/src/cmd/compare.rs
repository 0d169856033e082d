//! Implementation of `smile-check compare <REFERENCE> <TARGET>`.
//!
//! Reads both documents, runs the consistency check under the selected mode,
//! prints `consistent` or `inconsistent` to stdout and optionally appends the
//! verdict to a `--report` file.
//!
//! The check runs inside a tracing span carrying the trace context: the one
//! passed with `--traceparent` (as a child span) or a freshly generated one.
//!
//! Exit codes:
//! - 0 = consistent
//! - 1 = inconsistent
//! - 2 = unreadable input, malformed document or invalid configuration
use std::collections::HashMap;
use std::io::Write as _;
use std::path::Path;

use smile_core::{
    Comparator, ComparatorConfig, ComparisonMode, FieldSet, TRACE_HEADER_KEY, TraceContextError,
    TraceMetadata,
};

use crate::PathOrStdin;
use crate::error::CliError;
use crate::io::{read_input, read_path};
use crate::report::{ReportRow, append_row};

/// Runs the `compare` command.
///
/// # Errors
///
/// - [`CliError::StdinUsedTwice`] when both documents are `-`.
/// - [`CliError::InvalidConfiguration`] for a bad `--config` file,
///   `--ignore-field` name or `--traceparent` value.
/// - [`CliError::ParseFailed`] when either document is malformed.
/// - [`CliError::Inconsistent`] when the documents differ under `mode`.
/// - Any read or write failure from [`crate::io`] or [`crate::report`].
#[allow(clippy::too_many_arguments)]
pub fn run(
    reference: &PathOrStdin,
    target: &PathOrStdin,
    mode: ComparisonMode,
    ignore_fields: &[String],
    config: Option<&Path>,
    report: Option<&Path>,
    traceparent: Option<&str>,
    max_file_size: u64,
) -> Result<(), CliError> {
    if matches!(
        (reference, target),
        (PathOrStdin::Stdin, PathOrStdin::Stdin)
    ) {
        return Err(CliError::StdinUsedTwice);
    }

    let trace = resolve_trace(traceparent)?;
    let span = trace.span("compare");
    let _entered = span.enter();

    let comparator = Comparator::new(load_config(config, max_file_size)?);
    let ignored = if ignore_fields.is_empty() {
        None
    } else {
        Some(FieldSet::try_from_names(ignore_fields)?)
    };

    let reference_text = read_input(reference, max_file_size)?;
    let target_text = read_input(target, max_file_size)?;
    let consistent = comparator.compare(&reference_text, &target_text, ignored.as_ref(), mode)?;

    let (reference_label, target_label) = (reference.to_string(), target.to_string());
    tracing::info!(
        reference = %reference_label,
        target = %target_label,
        %mode,
        consistent,
        "comparison finished"
    );

    let verdict = if consistent { "consistent" } else { "inconsistent" };
    writeln!(std::io::stdout().lock(), "{verdict}").map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })?;

    if let Some(path) = report {
        append_row(
            path,
            &ReportRow {
                reference: &reference_label,
                target: &target_label,
                mode: mode.as_str(),
                consistent,
                traceparent: trace.as_str(),
            },
        )?;
    }

    if consistent {
        Ok(())
    } else {
        Err(CliError::Inconsistent)
    }
}

/// Continues the propagated trace as a child span, or starts a new trace.
fn resolve_trace(traceparent: Option<&str>) -> Result<TraceMetadata, CliError> {
    let mut carrier = HashMap::new();
    if let Some(value) = traceparent {
        carrier.insert(TRACE_HEADER_KEY.to_owned(), value.to_owned());
    }
    let trace = match TraceMetadata::extract(&carrier).map_err(trace_error)? {
        Some(parent) => parent.child(),
        None => TraceMetadata::generate(),
    };
    trace.map_err(trace_error)
}

fn trace_error(e: TraceContextError) -> CliError {
    match e {
        TraceContextError::InvalidTraceparent(_) => CliError::InvalidConfiguration {
            detail: e.to_string(),
        },
        TraceContextError::CsprngFailure(_) => CliError::IoError {
            source: "random source".to_owned(),
            detail: e.to_string(),
        },
    }
}

/// Loads a [`ComparatorConfig`] from JSON; fields left out keep their
/// built-in values.
fn load_config(path: Option<&Path>, max_file_size: u64) -> Result<ComparatorConfig, CliError> {
    let Some(path) = path else {
        return Ok(ComparatorConfig::default());
    };
    let text = read_path(path, max_file_size)?;
    serde_json::from_str(&text).map_err(|e| CliError::InvalidConfiguration {
        detail: format!("{}: {e}", path.display()),
    })
}
