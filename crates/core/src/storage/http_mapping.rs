//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `Decode` -> 500 (Internal Server Error)
/// - `Cancelled` -> 503 (Service Unavailable)
///
/// # Examples
///
/// ```
/// use opinions_core::storage::{repository_error_to_status_code, RepositoryError};
///
/// let error = RepositoryError::ConnectionFailed("no route to host".to_string());
/// assert_eq!(repository_error_to_status_code(&error), 503);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::Decode { .. } => 500,
        RepositoryError::Cancelled => 503,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DecodeError;

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("database connection timeout".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_query_failed_maps_to_500() {
        let error = RepositoryError::QueryFailed("Throughput exceeded, please retry".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_decode_maps_to_500() {
        let error = RepositoryError::decode("Comment", DecodeError::MissingField { field: "comment" });
        assert_eq!(repository_error_to_status_code(&error), 500);
    }

    #[test]
    fn test_cancelled_maps_to_503() {
        assert_eq!(repository_error_to_status_code(&RepositoryError::Cancelled), 503);
    }
}
