//! tao.app REST API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;
use serde_json::Value;

use crate::auth::{API_KEY_HEADER, CredentialsProvider, EnvCredentials};
use crate::error::{ApiError, TaoError};
use crate::rest::endpoints::TAO_BASE_URL;
use crate::rest::traits::TaoClient;
use crate::rest::types::{
    BalanceHistoryRequest, DateRangeRequest, MacroAnalyticsRequest, MetagraphRequest,
    NetuidFilter, PortfolioEventsRequest, RootApyRequest, SubnetAnalyticsRequest,
    SubnetOhlcRequest, SubnetPageRequest, SubnetTransactionsRequest,
};

/// Default upstream request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The tao.app REST API client.
///
/// Every request is a GET carrying the API key in the `X-API-Key` header.
/// Successful responses are returned as raw JSON; any non-success status
/// becomes [`TaoError::Api`] with the upstream body preserved.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use tao_income_api::auth::StaticCredentials;
/// use tao_income_api::rest::TaoRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = TaoRestClient::builder()
///         .credentials(Arc::new(StaticCredentials::new("api_key")))
///         .build();
///
///     let subnets = client.subnets().await?;
///     println!("Subnets: {subnets}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TaoRestClient {
    http_client: ClientWithMiddleware,
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
}

impl TaoRestClient {
    /// Create a new client with default settings and the key from `TAO_API_KEY`, if set.
    pub fn new() -> Self {
        Self::builder().credentials_from_env().build()
    }

    /// Create a new client builder.
    pub fn builder() -> TaoRestClientBuilder {
        TaoRestClientBuilder::new()
    }

    /// The upstream base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether an API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| c.get_credentials().is_configured())
    }

    /// Make an authenticated GET request.
    pub(crate) async fn get(&self, endpoint: &str) -> Result<Value, TaoError> {
        let url = format!("{}{}", self.base_url, endpoint);
        self.send(url).await
    }

    /// Make an authenticated GET request with query parameters.
    pub(crate) async fn get_with_params<Q>(
        &self,
        endpoint: &str,
        params: &Q,
    ) -> Result<Value, TaoError>
    where
        Q: serde::Serialize + ?Sized,
    {
        let query_string = serde_urlencoded::to_string(params)
            .map_err(|e| TaoError::InvalidResponse(e.to_string()))?;
        let url = if query_string.is_empty() {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}{}?{}", self.base_url, endpoint, query_string)
        };
        self.send(url).await
    }

    async fn send(&self, url: String) -> Result<Value, TaoError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(TaoError::MissingCredentials)?
            .get_credentials();

        tracing::debug!(%url, "Calling tao.app");
        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, credentials.expose_key())
            .send()
            .await
            .map_err(map_send_error)?;

        self.parse_response(response).await
    }

    /// Parse a response from the tao.app API.
    async fn parse_response(&self, response: reqwest::Response) -> Result<Value, TaoError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                TaoError::Timeout
            } else {
                TaoError::Http(e)
            }
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "tao.app returned an error status");
            return Err(TaoError::Api(ApiError::new(status.as_u16(), body)));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            TaoError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
        })
    }
}

fn map_send_error(error: reqwest_middleware::Error) -> TaoError {
    match error {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => TaoError::Timeout,
        reqwest_middleware::Error::Reqwest(e) => TaoError::Http(e),
        other => TaoError::HttpMiddleware(other),
    }
}

impl Default for TaoRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaoRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaoRestClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Builder for [`TaoRestClient`].
pub struct TaoRestClientBuilder {
    base_url: String,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
    max_retries: u32,
}

impl TaoRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: TAO_BASE_URL.to_string(),
            credentials: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: 0,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the credentials provider.
    pub fn credentials(mut self, credentials: Arc<dyn CredentialsProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Use the key from `TAO_API_KEY` if it is set.
    pub fn credentials_from_env(mut self) -> Self {
        if let Some(env) = EnvCredentials::try_from_env() {
            self.credentials = Some(Arc::new(env));
        }
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retries for transient failures.
    ///
    /// Defaults to zero: failures surface to the caller immediately.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Build the client.
    pub fn build(self) -> TaoRestClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("tao-income-api/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("tao-income-api"));
        headers.insert(USER_AGENT, header_value);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // Build the HTTP client with middleware.
        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.max_retries);

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        TaoRestClient {
            http_client: client,
            base_url: self.base_url,
            credentials: self.credentials,
        }
    }
}

impl Default for TaoRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// TaoClient trait implementation.

impl TaoClient for TaoRestClient {
    // ========== Market ==========

    async fn current(&self) -> Result<Value, TaoError> {
        TaoRestClient::current(self).await
    }

    async fn subnet_screener(&self) -> Result<Value, TaoError> {
        TaoRestClient::subnet_screener(self).await
    }

    async fn fear_greed(&self, request: &DateRangeRequest) -> Result<Value, TaoError> {
        TaoRestClient::fear_greed(self, request).await
    }

    async fn fear_greed_current(&self) -> Result<Value, TaoError> {
        TaoRestClient::fear_greed_current(self).await
    }

    async fn price_sustainability(&self, request: &NetuidFilter) -> Result<Value, TaoError> {
        TaoRestClient::price_sustainability(self, request).await
    }

    async fn root_apy(&self, request: &RootApyRequest) -> Result<Value, TaoError> {
        TaoRestClient::root_apy(self, request).await
    }

    async fn alpha_apy(&self, request: &SubnetPageRequest) -> Result<Value, TaoError> {
        TaoRestClient::alpha_apy(self, request).await
    }

    async fn macro_analytics(&self, request: &MacroAnalyticsRequest) -> Result<Value, TaoError> {
        TaoRestClient::macro_analytics(self, request).await
    }

    async fn validator_identities(&self) -> Result<Value, TaoError> {
        TaoRestClient::validator_identities(self).await
    }

    // ========== Subnets ==========

    async fn subnets(&self) -> Result<Value, TaoError> {
        TaoRestClient::subnets(self).await
    }

    async fn subnet_info(&self, netuid: u32) -> Result<Value, TaoError> {
        TaoRestClient::subnet_info(self, netuid).await
    }

    async fn subnet_holders(&self, netuid: u32) -> Result<Value, TaoError> {
        TaoRestClient::subnet_holders(self, netuid).await
    }

    async fn subnet_transactions(
        &self,
        request: &SubnetTransactionsRequest,
    ) -> Result<Value, TaoError> {
        TaoRestClient::subnet_transactions(self, request).await
    }

    async fn subnet_ohlc(&self, request: &SubnetOhlcRequest) -> Result<Value, TaoError> {
        TaoRestClient::subnet_ohlc(self, request).await
    }

    async fn subnet_valuation(&self, request: &SubnetPageRequest) -> Result<Value, TaoError> {
        TaoRestClient::subnet_valuation(self, request).await
    }

    async fn subnet_metagraph(
        &self,
        netuid: u32,
        request: &MetagraphRequest,
    ) -> Result<Value, TaoError> {
        TaoRestClient::subnet_metagraph(self, netuid, request).await
    }

    async fn subnet_tags(&self) -> Result<Value, TaoError> {
        TaoRestClient::subnet_tags(self).await
    }

    async fn subnet_analytics(
        &self,
        request: &SubnetAnalyticsRequest,
    ) -> Result<Value, TaoError> {
        TaoRestClient::subnet_analytics(self, request).await
    }

    // ========== Portfolio ==========

    async fn portfolio_balance(&self, coldkey: &str) -> Result<Value, TaoError> {
        TaoRestClient::portfolio_balance(self, coldkey).await
    }

    async fn balance_history(&self, request: &BalanceHistoryRequest) -> Result<Value, TaoError> {
        TaoRestClient::balance_history(self, request).await
    }

    async fn portfolio_events(
        &self,
        request: &PortfolioEventsRequest,
    ) -> Result<Value, TaoError> {
        TaoRestClient::portfolio_events(self, request).await
    }
}
