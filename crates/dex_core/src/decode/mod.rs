//! Strict decoding of bundled record resources.
//!
//! # Responsibility
//! - Turn raw resource bytes into a validated `DomainRecord`.
//! - Apply key naming conversion before structural decoding.
//!
//! # Invariants
//! - Unknown fields are ignored; missing or mistyped required fields fail.
//! - There is no partial or best-effort record.

pub mod keys;

use crate::model::record::{DomainRecord, RecordFields, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use keys::{convert_from_snake_case, convert_keys};

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failure to materialize a record from a bundled resource.
///
/// Always fatal for the calling context: there is exactly one bundled
/// resource and no fallback source.
#[derive(Debug)]
pub enum DecodeError {
    MissingResource {
        name: String,
    },
    /// Logical resource name is not a plain file name.
    InvalidResourceName {
        name: String,
    },
    Io {
        name: String,
        source: std::io::Error,
    },
    /// Bytes are not JSON, or required fields are absent or mistyped.
    Malformed(serde_json::Error),
    InvalidRecord(RecordValidationError),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingResource { name } => write!(f, "bundled resource `{name}` not found"),
            Self::InvalidResourceName { name } => {
                write!(f, "invalid bundled resource name `{name}`")
            }
            Self::Io { name, source } => {
                write!(f, "failed to read bundled resource `{name}`: {source}")
            }
            Self::Malformed(err) => write!(f, "malformed record resource: {err}"),
            Self::InvalidRecord(err) => write!(f, "invalid record resource: {err}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed(err) => Some(err),
            Self::InvalidRecord(err) => Some(err),
            Self::MissingResource { .. } | Self::InvalidResourceName { .. } => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

impl From<RecordValidationError> for DecodeError {
    fn from(value: RecordValidationError) -> Self {
        Self::InvalidRecord(value)
    }
}

/// Decodes one record from snake_case JSON bytes.
///
/// # Errors
/// - `Malformed` for invalid JSON or a shape mismatch.
/// - `InvalidRecord` when fields decode but break record invariants.
pub fn decode_record(bytes: &[u8]) -> DecodeResult<DomainRecord> {
    let raw: serde_json::Value = serde_json::from_slice(bytes)?;
    let fields: RecordFields = serde_json::from_value(convert_keys(raw))?;
    Ok(DomainRecord::try_from(fields)?)
}
