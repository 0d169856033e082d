/// Trace-context propagation through flat string-keyed carriers.
///
/// Message headers and similar carriers hold the context under
/// [`TRACE_HEADER_KEY`] as a W3C `traceparent` value:
/// `00-<32 hex trace id>-<16 hex span id>-<2 hex flags>`. A publisher calls
/// [`TraceMetadata::inject`]; a consumer calls [`TraceMetadata::extract`] and
/// opens a [`tracing`] span with [`TraceMetadata::span`] so its log events
/// carry the same trace id.
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Carrier key under which the trace context travels.
pub const TRACE_HEADER_KEY: &str = "traceparent";

/// Lowercase hex only; version `00` is the only one defined.
static TRACEPARENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^00-[0-9a-f]{32}-[0-9a-f]{16}-[0-9a-f]{2}$")
        .unwrap_or_else(|_| unreachable!("traceparent pattern is a valid literal"))
});

/// Errors from building or reading a trace context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceContextError {
    /// The carrier value is not a well-formed `traceparent`.
    InvalidTraceparent(String),
    /// The platform CSPRNG failed while generating ids.
    CsprngFailure(getrandom::Error),
}

impl fmt::Display for TraceContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTraceparent(got) => write!(
                f,
                "invalid traceparent: expected 00-<32 hex>-<16 hex>-<2 hex> with non-zero ids, got {got:?}"
            ),
            Self::CsprngFailure(e) => write!(f, "CSPRNG failure: {e}"),
        }
    }
}

impl std::error::Error for TraceContextError {}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX_CHARS[usize::from(b >> 4)]));
        out.push(char::from(HEX_CHARS[usize::from(b & 0x0f)]));
    }
    out
}

/// `N` random bytes, never all zero (an all-zero id is invalid).
fn random_id<const N: usize>() -> Result<[u8; N], TraceContextError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf).map_err(TraceContextError::CsprngFailure)?;
    if buf.iter().all(|&b| b == 0) {
        if let Some(last) = buf.last_mut() {
            *last = 1;
        }
    }
    Ok(buf)
}

fn is_all_zero(hex: &str) -> bool {
    hex.bytes().all(|b| b == b'0')
}

/// A validated W3C `traceparent` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceMetadata(String);

impl TryFrom<&str> for TraceMetadata {
    type Error = TraceContextError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let candidate = Self(s.to_owned());
        if TRACEPARENT_RE.is_match(s)
            && !is_all_zero(candidate.trace_id())
            && !is_all_zero(candidate.span_id())
        {
            Ok(candidate)
        } else {
            Err(TraceContextError::InvalidTraceparent(s.to_owned()))
        }
    }
}

impl TraceMetadata {
    /// Starts a new sampled trace with fresh trace and span ids.
    ///
    /// # Errors
    ///
    /// Returns [`TraceContextError::CsprngFailure`] if the OS random source is
    /// unavailable.
    pub fn generate() -> Result<Self, TraceContextError> {
        let trace_id = random_id::<16>()?;
        let span_id = random_id::<8>()?;
        Ok(Self(format!(
            "00-{}-{}-01",
            hex_encode(&trace_id),
            hex_encode(&span_id)
        )))
    }

    /// A context for work caused by this one: same trace id and flags, new
    /// span id.
    ///
    /// # Errors
    ///
    /// Returns [`TraceContextError::CsprngFailure`] if the OS random source is
    /// unavailable.
    pub fn child(&self) -> Result<Self, TraceContextError> {
        let span_id = random_id::<8>()?;
        Ok(Self(format!(
            "00-{}-{}-{}",
            self.trace_id(),
            hex_encode(&span_id),
            self.flags()
        )))
    }

    /// The 32-hex-digit trace id.
    pub fn trace_id(&self) -> &str {
        self.0.get(3..35).unwrap_or_default()
    }

    /// The 16-hex-digit id of the span that produced this context.
    pub fn span_id(&self) -> &str {
        self.0.get(36..52).unwrap_or_default()
    }

    /// The 2-hex-digit trace flags.
    pub fn flags(&self) -> &str {
        self.0.get(53..55).unwrap_or_default()
    }

    /// Returns `true` when the sampled flag is set.
    pub fn is_sampled(&self) -> bool {
        u8::from_str_radix(self.flags(), 16).is_ok_and(|f| f & 0x01 == 1)
    }

    /// Returns the full `traceparent` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Writes this context into `carrier` under [`TRACE_HEADER_KEY`],
    /// replacing any previous value.
    pub fn inject(&self, carrier: &mut HashMap<String, String>) {
        carrier.insert(TRACE_HEADER_KEY.to_owned(), self.0.clone());
    }

    /// Reads a context from `carrier`.
    ///
    /// Returns `Ok(None)` when the key is missing or its value is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TraceContextError::InvalidTraceparent`] when the value is
    /// present but malformed.
    pub fn extract(carrier: &HashMap<String, String>) -> Result<Option<Self>, TraceContextError> {
        match carrier.get(TRACE_HEADER_KEY).map(|v| v.trim()) {
            None | Some("") => Ok(None),
            Some(value) => Self::try_from(value).map(Some),
        }
    }

    /// An info-level span tagged with this context's ids.
    pub fn span(&self, name: &str) -> tracing::Span {
        tracing::info_span!(
            "trace",
            operation = name,
            trace_id = self.trace_id(),
            span_id = self.span_id()
        )
    }
}

impl fmt::Display for TraceMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for TraceMetadata {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TraceMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TraceMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::try_from(s.as_str()).map_err(de::Error::custom)
    }
}
