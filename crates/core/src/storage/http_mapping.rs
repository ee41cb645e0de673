//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! This module provides HTTP status code mappings for [`RepositoryError`] variants,
//! following the Functional Core pattern - pure functions with no side effects.

use super::{RepositoryError, StoreError};

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `Encoding` -> 500 (Internal Server Error): the stored data is corrupt
/// - `Store` / `Unavailable` -> 503 (Service Unavailable)
/// - `Store` / `Rejected` -> 502 (Bad Gateway)
///
/// "Nothing found" is not an error and never reaches this function.
///
/// # Examples
///
/// ```
/// use supplycast_core::storage::{repository_error_to_status_code, RepositoryError, StoreError};
///
/// let error = RepositoryError::Store {
///     operation: "list projections",
///     source: StoreError::Unavailable("timeout".to_string()),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 503);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Encoding { .. } => 500,
        RepositoryError::Store { source, .. } => match source {
            StoreError::Unavailable(_) => 503,
            StoreError::Rejected(_) => 502,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_maps_to_500() {
        let error = RepositoryError::encoding("semana", "missing");
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_unavailable_maps_to_503() {
        let error = RepositoryError::Store {
            operation: "create projection",
            source: StoreError::Unavailable("Throughput exceeded".to_string()),
        };
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_rejected_maps_to_502() {
        let error = RepositoryError::Store {
            operation: "query projections by week",
            source: StoreError::Rejected("Requested resource not found".to_string()),
        };
        assert_eq!(repository_error_to_status_code(&error), 502);
    }
}
