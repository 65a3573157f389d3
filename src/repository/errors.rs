use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Backend rejected the API credentials")]
    Unauthorized,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Backend responded with {status}: {message}")]
    RemoteError { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Error body shape used by the finance backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: String,
}

impl RepositoryError {
    /// Maps a non-success response to an error, keeping the backend message.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|parsed| parsed.error)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::NOT_FOUND => RepositoryError::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RepositoryError::Unauthorized,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                RepositoryError::ValidationError(message)
            }
            _ => RepositoryError::RemoteError {
                status: status.as_u16(),
                message,
            },
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::DeserializationError(err.to_string())
        } else if err.is_connect() || err.is_timeout() {
            RepositoryError::ConnectionError(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::from_status(status, &err.to_string())
        } else {
            RepositoryError::Unexpected(format!("Unexpected HTTP error: {err}"))
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DeserializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_backend_error_message() {
        let err = RepositoryError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error": "Name is required"}"#,
        );
        assert!(matches!(err, RepositoryError::ValidationError(message) if message == "Name is required"));
    }

    #[test]
    fn maps_status_codes() {
        assert!(matches!(
            RepositoryError::from_status(StatusCode::NOT_FOUND, ""),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            RepositoryError::from_status(StatusCode::FORBIDDEN, ""),
            RepositoryError::Unauthorized
        ));
        assert!(matches!(
            RepositoryError::from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            RepositoryError::RemoteError { status: 502, message } if message == "upstream down"
        ));
    }
}
