//! Error types for the tao.app gateway and reward tooling.

use thiserror::Error;

/// The main error type for all gateway, client and analysis operations.
#[derive(Error, Debug)]
pub enum TaoError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error (listener bind, serve loop)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tao.app API answered with a non-success status
    #[error("Tao API error: {0}")]
    Api(ApiError),

    /// Local rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_ms:?}ms")]
    RateLimitExceeded {
        /// Suggested wait time in milliseconds before retrying
        retry_after_ms: Option<u64>,
    },

    /// A snapshot batch failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response from the API
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Missing API key
    #[error("Missing credentials: an API key is required for tao.app requests")]
    MissingCredentials,
}

impl TaoError {
    /// Whether the caller may retry the same request later.
    ///
    /// Rate limit rejections and upstream 5xx/429 answers are recoverable;
    /// validation and configuration failures are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TaoError::RateLimitExceeded { .. } | TaoError::Timeout => true,
            TaoError::Api(api) => api.is_server_error() || api.is_rate_limit(),
            _ => false,
        }
    }

    /// Whether this error came from the transport layer rather than an API answer.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            TaoError::Http(_) | TaoError::HttpMiddleware(_) | TaoError::Timeout
        )
    }
}

/// A non-success answer from the tao.app API.
///
/// The body is kept verbatim so the gateway can relay it to its own caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code returned upstream
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tao API returned status code {}", self.status)
    }
}

impl ApiError {
    /// Create a new API error from a status code and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the upstream rejected the request for rate limiting.
    pub fn is_rate_limit(&self) -> bool {
        self.status == 429
    }

    /// Check if the upstream rejected the API key.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401 || self.status == 403
    }

    /// Check if the upstream failed internally.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = ApiError::new(404, "not found");
        assert_eq!(error.to_string(), "Tao API returned status code 404");
        assert_eq!(
            TaoError::Api(error).to_string(),
            "Tao API error: Tao API returned status code 404"
        );
    }

    #[test]
    fn test_api_error_classification() {
        assert!(ApiError::new(429, "").is_rate_limit());
        assert!(ApiError::new(401, "").is_unauthorized());
        assert!(ApiError::new(503, "").is_server_error());
        assert!(!ApiError::new(400, "").is_server_error());
    }

    #[test]
    fn test_recoverable() {
        assert!(TaoError::RateLimitExceeded { retry_after_ms: Some(10) }.is_recoverable());
        assert!(TaoError::Api(ApiError::new(502, "")).is_recoverable());
        assert!(!TaoError::Api(ApiError::new(400, "")).is_recoverable());
        assert!(!TaoError::Validation("missing stake".into()).is_recoverable());
    }
}
