#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod compare;
pub mod error;
pub mod trace_context;
pub mod value;
pub mod vocab;

pub use compare::{
    Comparator, ComparatorConfig, ComparisonMode, FieldSet, ModePolicy, RecordKind, RenameTable,
    compare,
};
pub use error::{ComparatorError, Side};
pub use trace_context::{TRACE_HEADER_KEY, TraceContextError, TraceMetadata};
pub use value::{FieldValue, Record, parse_document};
pub use vocab::{
    CmoSampleClass, NucleicAcid, Preservation, SampleOrigin, SampleType, SpecimenType,
    TumorNormalType, Vocabulary, VocabularyError, validate,
};

/// Returns the current version of the smile-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
