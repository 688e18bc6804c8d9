//! Error types for the motif search service.

use thiserror::Error;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for motif search operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage operation failed: opening a transaction, preparing or
    /// executing a statement, or decoding a row.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Boolean expression could not be parsed.
    #[error("Query parse error: {0}")]
    QueryParse(String),

    /// Caller supplied no terms or an empty expression.
    #[error("Empty search: {0}")]
    EmptyScope(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Malformed motif file during import.
    #[error("Format error: {0}")]
    Format(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error was caused by the request itself rather than by
    /// the storage backend.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            Error::QueryParse(_) | Error::EmptyScope(_) | Error::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_query_parse() {
        let err = Error::QueryParse("unbalanced parentheses".to_string());
        assert_eq!(err.to_string(), "Query parse error: unbalanced parentheses");
    }

    #[test]
    fn test_error_display_empty_scope() {
        let err = Error::EmptyScope("no search terms".to_string());
        assert_eq!(err.to_string(), "Empty search: no search terms");
    }

    #[test]
    fn test_error_display_format() {
        let err = Error::Format("line 4: expected 4 columns".to_string());
        assert_eq!(err.to_string(), "Format error: line 4: expected 4 columns");
    }

    #[test]
    fn test_bad_input_classification() {
        assert!(Error::QueryParse("x".into()).is_bad_input());
        assert!(Error::EmptyScope("x".into()).is_bad_input());
        assert!(Error::InvalidInput("x".into()).is_bad_input());
        assert!(!Error::Database(sqlx::Error::PoolTimedOut).is_bad_input());
        assert!(!Error::Config("x".into()).is_bad_input());
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::Database(_)));
        assert!(err.to_string().starts_with("Database error:"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().contains("Serialization error:"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.meme");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("missing.meme"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
