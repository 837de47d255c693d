//! Error types for template decoding, encoding and mutation.

use thiserror::Error;

use crate::path::FieldPath;

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding, encoding or editing a template.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Malformed JSON at line {line}, column {column}: {message}")]
    MalformedJson {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Unknown field `{field}` at {path}")]
    UnknownField { path: FieldPath, field: String },

    #[error("Missing required property `{property}` at {path}")]
    MissingRequiredProperty { path: FieldPath, property: String },

    #[error("Malformed intrinsic function at {path}: {reason}")]
    MalformedExpression { path: FieldPath, reason: String },

    #[error("Expected {expected} at {path}, found {found}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid policy `{value}` at {path}")]
    InvalidPolicy { path: FieldPath, value: String },

    #[error("Invalid section entry at {path}: {message}")]
    InvalidSection { path: FieldPath, message: String },

    #[error("Logical name `{0}` already exists in the template")]
    DuplicateLogicalName(String),

    #[error("Logical name `{0}` does not exist in the template")]
    MissingLogicalName(String),

    #[error("YAML error: {0}")]
    Yaml(String),
}

impl Error {
    /// Logical name of the resource an error points into, if any.
    pub fn logical_name(&self) -> Option<&str> {
        let path = match self {
            Error::UnknownField { path, .. }
            | Error::MissingRequiredProperty { path, .. }
            | Error::MalformedExpression { path, .. }
            | Error::TypeMismatch { path, .. }
            | Error::InvalidPolicy { path, .. }
            | Error::InvalidSection { path, .. } => path,
            Error::DuplicateLogicalName(name) | Error::MissingLogicalName(name) => {
                return Some(name)
            }
            Error::MalformedJson { .. } | Error::Yaml(_) => return None,
        };
        let mut segments = path.as_str().split('.');
        match segments.next() {
            Some("Resources") => segments.next().map(|s| s.split('[').next().unwrap_or(s)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedJson {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yml::Error> for Error {
    fn from(err: serde_yml::Error) -> Self {
        Error::Yaml(err.to_string())
    }
}

/// JSON kind name used in `TypeMismatch` diagnostics.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
