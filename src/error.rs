//! Error types
//!
//! Validation failures raised by the data-model layer. Batch and protocol
//! failures are reported through [`crate::exception::AdkException`].

use crate::value::SifDataType;
use crate::version::SifVersion;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, AdkError>;

/// Wire text that could not be converted to a typed value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse {text:?} as {data_type:?}: {reason}")]
pub struct ParseError {
    pub text: String,
    pub data_type: SifDataType,
    pub reason: String,
}

impl ParseError {
    pub fn new(text: &str, data_type: SifDataType, reason: impl Into<String>) -> Self {
        Self {
            text: text.to_string(),
            data_type,
            reason: reason.into(),
        }
    }
}

/// Data-model errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdkError {
    /// A definition could not be resolved for the active version
    #[error("{kind} '{name}' is not defined for SIF {version} (is the schema for this object loaded?)")]
    SchemaMismatch {
        name: String,
        version: SifVersion,
        kind: &'static str,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid cast: expected {expected}, got {actual}")]
    InvalidCast { expected: String, actual: String },

    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("definition '{replacement}' cannot replace '{current}'")]
    DefinitionConflict { current: String, replacement: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl AdkError {
    pub(crate) fn invalid_cast(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        AdkError::InvalidCast {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<config::ConfigError> for AdkError {
    fn from(err: config::ConfigError) -> Self {
        AdkError::Config(err.to_string())
    }
}
