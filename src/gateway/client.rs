//! Client for a running gateway.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde_json::Value;

use crate::error::{ApiError, TaoError};
use crate::rest::DEFAULT_TIMEOUT;
use crate::rewards::{Snapshot, parse_snapshots};

/// Fetches portfolio data through a gateway and unwraps its envelope.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http_client: ClientWithMiddleware,
    base_url: String,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http_client: ClientBuilder::new(reqwest_client)
                .with(TracingMiddleware::default())
                .build(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The current portfolio balance snapshots of a coldkey.
    pub async fn portfolio_snapshots(&self, coldkey: &str) -> Result<Vec<Snapshot>, TaoError> {
        let data = self
            .get("/portfolio/balance", &[("coldkey", coldkey)])
            .await?;
        parse_snapshots(&data)
    }

    /// GET a gateway route and return the envelope's `data`.
    pub async fn get(&self, route: &str, query: &[(&str, &str)]) -> Result<Value, TaoError> {
        let query_string = serde_urlencoded::to_string(query)
            .map_err(|e| TaoError::InvalidResponse(e.to_string()))?;
        let url = if query_string.is_empty() {
            format!("{}{}", self.base_url, route)
        } else {
            format!("{}{}?{}", self.base_url, route, query_string)
        };
        tracing::debug!(%url, "Calling gateway");
        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(TaoError::RateLimitExceeded {
                    retry_after_ms: None,
                });
            }
            return Err(TaoError::Api(ApiError::new(status.as_u16(), body)));
        }

        let mut envelope: Value = serde_json::from_str(&body)?;
        match envelope.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(TaoError::InvalidResponse(format!(
                "gateway response has no data field: {body}"
            ))),
        }
    }
}
