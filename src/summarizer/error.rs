//! Summarizer error types.

use crate::error::ApiError;

/// Errors from the summarization backend.
#[derive(Debug, thiserror::Error)]
pub enum SummarizerError {
    /// No backend is configured.
    #[error("summarization is not configured")]
    Disabled,
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Backend returned a non-2xx status.
    #[error("summarizer {endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response body was not the expected JSON.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<SummarizerError> for ApiError {
    fn from(error: SummarizerError) -> Self {
        match error {
            SummarizerError::Disabled => {
                ApiError::ServiceUnavailable("Post summarization is not available".to_string())
            }
            SummarizerError::Client(reason) => ApiError::InternalError(reason),
            other => ApiError::UpstreamError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_disabled_maps_to_503() {
        let api: ApiError = SummarizerError::Disabled.into();
        assert_eq!(api.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_bad_status_maps_to_502() {
        let api: ApiError = SummarizerError::Status {
            endpoint: "http://localhost:11434/api/generate".into(),
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert_eq!(api.status_code(), StatusCode::BAD_GATEWAY);
    }
}
