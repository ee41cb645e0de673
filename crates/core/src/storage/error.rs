use thiserror::Error;

/// Failures reported by an [`ItemStore`](super::ItemStore) backend.
///
/// The original message of the underlying store is always preserved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or asked the caller to back off
    /// (network failure, throttling, internal server error).
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    /// The store refused the request (validation, missing table, ...).
    #[error("Store rejected request: {0}")]
    Rejected(String),
}

impl StoreError {
    /// The underlying store message without the classification prefix.
    pub fn message(&self) -> &str {
        match self {
            StoreError::Unavailable(message) | StoreError::Rejected(message) => message,
        }
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A stored item is missing a required field or holds a malformed value.
    #[error("Invalid stored field {field}: {reason}")]
    Encoding { field: &'static str, reason: String },
    /// The underlying store failed while running `operation`.
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        source: StoreError,
    },
}

impl RepositoryError {
    pub fn encoding(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Encoding {
            field,
            reason: reason.into(),
        }
    }

    /// Returns a closure wrapping a [`StoreError`] raised by `operation`.
    ///
    /// Meant for `map_err`: `store.put_item(item).await.map_err(RepositoryError::during("create projection"))?`
    pub fn during(operation: &'static str) -> impl Fn(StoreError) -> Self {
        move |source| Self::Store { operation, source }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Result type for item store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_unavailable_display() {
        let error = StoreError::Unavailable("connection reset".to_string());
        assert_eq!(error.to_string(), "Store unavailable: connection reset");
        assert_eq!(error.message(), "connection reset");
    }

    #[test]
    fn test_store_error_rejected_display() {
        let error = StoreError::Rejected("One or more parameter values were invalid".to_string());
        assert_eq!(
            error.to_string(),
            "Store rejected request: One or more parameter values were invalid"
        );
    }

    #[test]
    fn test_repository_error_encoding_display() {
        let error = RepositoryError::encoding("fecha_proyeccion", "missing");
        assert_eq!(
            error.to_string(),
            "Invalid stored field fecha_proyeccion: missing"
        );
    }

    #[test]
    fn test_repository_error_store_keeps_original_message() {
        let wrap = RepositoryError::during("create projection");
        let error = wrap(StoreError::Unavailable("Throughput exceeded".to_string()));

        assert_eq!(
            error.to_string(),
            "create projection failed: Store unavailable: Throughput exceeded"
        );
        assert!(matches!(
            error,
            RepositoryError::Store {
                operation: "create projection",
                ..
            }
        ));
    }
}
