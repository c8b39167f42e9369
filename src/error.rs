//! error types shared by the clause, predicate and trigger modules

use thiserror::Error;

/// error returned when building or decoding clauses, predicates and triggers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// a JSON tree does not match any known clause, predicate or trigger shape
    #[error("{}", display_with_path(.path, .message))]
    MalformedInput { message: String, path: String },

    /// the predicate variant (or the request as a whole) is not accepted by
    /// the API surface in use
    #[error("unsupported: {0}")]
    UnsupportedVariant(String),

    /// a clause could not be constructed from the given parts
    #[error("invalid clause: {0}")]
    InvalidClause(String),
}

impl Error {
    pub fn malformed(message: impl Into<String>, path: impl Into<String>) -> Self {
        Error::MalformedInput {
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedVariant(message.into())
    }

    /// JSON path of the offending node, if this is a parse failure
    pub fn path(&self) -> Option<&str> {
        match self {
            Error::MalformedInput { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedInput { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::UnsupportedVariant(_))
    }
}

fn display_with_path(path: &str, message: &str) -> String {
    if path.is_empty() {
        message.to_string()
    } else {
        format!("{}: {}", path, message)
    }
}

/// result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
