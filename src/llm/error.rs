//! Errors raised while calling the hosted model.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LlmError {
    /// 401/403 from the API.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// 429 from the API.
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// Any other 4xx.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 5xx or otherwise unexpected status.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Connection, TLS or timeout failure.
    #[error("network error: {0}")]
    Network(String),

    /// Body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The API answered without any choices.
    #[error("API returned no choices")]
    EmptyResponse,
}

impl LlmError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::RateLimit(body),
            400..=499 => Self::InvalidRequest(body),
            _ => Self::Api { status, body },
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert!(matches!(LlmError::from_status(401, String::new()), LlmError::Auth(_)));
        assert!(matches!(LlmError::from_status(403, String::new()), LlmError::Auth(_)));
        assert!(matches!(LlmError::from_status(429, String::new()), LlmError::RateLimit(_)));
        assert!(matches!(
            LlmError::from_status(422, String::new()),
            LlmError::InvalidRequest(_)
        ));
        assert!(matches!(
            LlmError::from_status(503, String::new()),
            LlmError::Api { status: 503, .. }
        ));
    }
}
