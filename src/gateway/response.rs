//! Response envelope and error mapping for the gateway.

use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::{HeaderValue, StatusCode, header::RETRY_AFTER, request::Parts},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::TaoError;
use crate::rate_limit::RateLimitStatus;

/// Limiter counters attached to every successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub calls_made: u32,
    pub calls_remaining: u32,
}

impl From<RateLimitStatus> for RateLimitInfo {
    fn from(status: RateLimitStatus) -> Self {
        Self {
            calls_made: status.calls_made,
            calls_remaining: status.calls_remaining,
        }
    }
}

/// `{success: true, data, rate_limit_info}`.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
    pub rate_limit_info: RateLimitInfo,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, status: RateLimitStatus) -> Self {
        Self {
            success: true,
            data,
            rate_limit_info: status.into(),
        }
    }
}

/// An error on its way out of the gateway.
///
/// Carries the configured call limit so rate limit rejections can name it.
#[derive(Debug)]
pub struct GatewayError {
    error: TaoError,
    max_calls: Option<u32>,
}

impl GatewayError {
    /// Attach the configured call limit.
    pub fn with_limit(mut self, max_calls: u32) -> Self {
        self.max_calls = Some(max_calls);
        self
    }

    pub fn error(&self) -> &TaoError {
        &self.error
    }
}

impl From<TaoError> for GatewayError {
    fn from(error: TaoError) -> Self {
        Self {
            error,
            max_calls: None,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self.error {
            TaoError::RateLimitExceeded { retry_after_ms } => {
                let detail = match self.max_calls {
                    Some(max_calls) => {
                        format!("Rate limit exceeded. Maximum {max_calls} calls per minute.")
                    }
                    None => "Rate limit exceeded.".to_string(),
                };
                let mut response =
                    (StatusCode::TOO_MANY_REQUESTS, Json(json!({ "detail": detail })))
                        .into_response();
                if let Some(ms) = retry_after_ms {
                    response
                        .headers_mut()
                        .insert(RETRY_AFTER, HeaderValue::from(ms.div_ceil(1000)));
                }
                response
            }
            TaoError::Api(api) => {
                tracing::warn!(status = api.status, "Relaying upstream failure");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({
                        "success": false,
                        "error": api.to_string(),
                        "response_text": api.body,
                    })),
                )
                    .into_response()
            }
            TaoError::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            other => {
                tracing::error!(error = %other, "Upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": format!("Request to Tao API failed: {other}") })),
                )
                    .into_response()
            }
        }
    }
}

/// Query string extractor that rejects with `422 {detail}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ValidQuery(value)),
            Err(rejection) => Err(TaoError::Validation(rejection.body_text()).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_rate_limit_maps_to_429() {
        let error = GatewayError::from(TaoError::RateLimitExceeded {
            retry_after_ms: Some(1500),
        })
        .with_limit(10);
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[RETRY_AFTER], "2");
    }

    #[test]
    fn test_api_error_maps_to_502() {
        let error = GatewayError::from(TaoError::Api(ApiError::new(404, "missing")));
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_maps_to_422() {
        let error = GatewayError::from(TaoError::Validation("bad".into()));
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_transport_maps_to_500() {
        let error = GatewayError::from(TaoError::Timeout);
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
