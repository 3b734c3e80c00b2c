//! Error taxonomy shared by the store, costing and sizing layers

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by catalog, costing and conversion operations
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A referenced record does not exist
    #[error("{kind} not found: {key}")]
    #[diagnostic(code(fwc::not_found))]
    NotFound { kind: &'static str, key: String },

    /// A unique key is already taken
    #[error("{kind} already exists: {key}")]
    #[diagnostic(
        code(fwc::conflict),
        help("use the matching `show` command to inspect the existing record")
    )]
    Conflict { kind: &'static str, key: String },

    /// Input rejected by a domain rule
    #[error("validation failed: {0}")]
    #[diagnostic(code(fwc::validation))]
    Validation(String),

    #[error("database error: {0}")]
    #[diagnostic(code(fwc::database))]
    Database(#[from] rusqlite::Error),

    /// Stored value could not be decoded back into its domain type
    #[error("corrupt {field} value '{value}'")]
    #[diagnostic(code(fwc::decode))]
    Decode { field: &'static str, value: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(fwc::io))]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            key: key.into(),
        }
    }

    pub fn conflict(kind: &'static str, key: impl Into<String>) -> Self {
        Error::Conflict {
            kind,
            key: key.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::not_found("size chart", "EU-M");
        assert_eq!(err.to_string(), "size chart not found: EU-M");
        assert!(err.is_not_found());

        let err = Error::conflict("product", "PRM-LTH-001");
        assert_eq!(err.to_string(), "product already exists: PRM-LTH-001");
        assert!(err.is_conflict());
    }

    #[test]
    fn test_validation_message() {
        let err = Error::validation("quantity must be at least 1");
        assert_eq!(
            err.to_string(),
            "validation failed: quantity must be at least 1"
        );
        assert!(!err.is_not_found());
    }
}
