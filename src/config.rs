//! Gateway configuration from the environment.
//!
//! A `.env` file in the working directory is loaded first if present; real
//! environment variables take precedence over it.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::auth::{API_KEY_ENV_VAR, Credentials, StaticCredentials};
use crate::error::TaoError;
use crate::rate_limit::{DEFAULT_MAX_CALLS, DEFAULT_WINDOW, RateLimitConfig};
use crate::rest::{DEFAULT_TIMEOUT, TAO_BASE_URL, TaoRestClient};

pub const BASE_URL_ENV_VAR: &str = "TAO_API_BASE_URL";
pub const HOST_ENV_VAR: &str = "GATEWAY_HOST";
pub const PORT_ENV_VAR: &str = "GATEWAY_PORT";
pub const MAX_CALLS_ENV_VAR: &str = "RATE_LIMIT_MAX_CALLS";
pub const WINDOW_ENV_VAR: &str = "RATE_LIMIT_WINDOW_SECS";
pub const TIMEOUT_ENV_VAR: &str = "UPSTREAM_TIMEOUT_SECS";
pub const RETRIES_ENV_VAR: &str = "UPSTREAM_MAX_RETRIES";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

/// Everything the gateway needs to start.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API key for tao.app, `None` when unset.
    pub credentials: Option<Credentials>,
    /// Upstream base URL without a trailing slash.
    pub base_url: String,
    pub host: String,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    pub upstream_timeout: Duration,
    pub max_retries: u32,
}

impl GatewayConfig {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Result<Self, TaoError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }

        let base_url = env::var(BASE_URL_ENV_VAR).unwrap_or_else(|_| TAO_BASE_URL.to_string());
        Url::parse(&base_url)
            .map_err(|e| TaoError::Config(format!("{BASE_URL_ENV_VAR}={base_url}: {e}")))?;

        let max_calls: u32 = parse_var(MAX_CALLS_ENV_VAR, DEFAULT_MAX_CALLS)?;
        if max_calls == 0 {
            return Err(TaoError::Config(format!("{MAX_CALLS_ENV_VAR} must be at least 1")));
        }
        let window_secs: u64 = parse_var(WINDOW_ENV_VAR, DEFAULT_WINDOW.as_secs())?;
        if window_secs == 0 {
            return Err(TaoError::Config(format!("{WINDOW_ENV_VAR} must be at least 1")));
        }

        Ok(Self {
            credentials: env::var(API_KEY_ENV_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty())
                .map(Credentials::new),
            base_url: base_url.trim_end_matches('/').to_string(),
            host: env::var(HOST_ENV_VAR).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: parse_var(PORT_ENV_VAR, DEFAULT_PORT)?,
            rate_limit: RateLimitConfig {
                max_calls,
                window: Duration::from_secs(window_secs),
                enabled: true,
            },
            upstream_timeout: Duration::from_secs(parse_var(
                TIMEOUT_ENV_VAR,
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            max_retries: parse_var(RETRIES_ENV_VAR, 0)?,
        })
    }

    /// Resolve the listen address; `host` may be an IP or a hostname.
    pub async fn bind_addr(&self) -> Result<SocketAddr, TaoError> {
        let invalid = |reason: String| {
            TaoError::Config(format!("invalid listen address {}:{}: {reason}", self.host, self.port))
        };
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| invalid(e.to_string()))?
            .next()
            .ok_or_else(|| invalid("no addresses found".to_string()))
    }

    /// Fail unless an API key is configured.
    pub fn require_credentials(&self) -> Result<&Credentials, TaoError> {
        self.credentials
            .as_ref()
            .filter(|c| c.is_configured())
            .ok_or(TaoError::MissingCredentials)
    }

    /// Build the upstream client described by this configuration.
    pub fn rest_client(&self) -> TaoRestClient {
        let mut builder = TaoRestClient::builder()
            .base_url(&self.base_url)
            .timeout(self.upstream_timeout)
            .max_retries(self.max_retries);
        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(Arc::new(StaticCredentials::from_credentials(
                credentials.clone(),
            )));
        }
        builder.build()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            base_url: TAO_BASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rate_limit: RateLimitConfig::default(),
            upstream_timeout: DEFAULT_TIMEOUT,
            max_retries: 0,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, TaoError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(name, env::var(name).ok(), default)
}

/// Parse a raw setting, falling back to `default` when it is absent or blank.
fn parse_value<T>(name: &str, raw: Option<String>, default: T) -> Result<T, TaoError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| TaoError::Config(format!("{name}={raw}: {e}"))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_defaults() {
        let value: u32 = parse_value(MAX_CALLS_ENV_VAR, None, 7).unwrap();
        assert_eq!(value, 7);
        let value: u32 = parse_value(MAX_CALLS_ENV_VAR, Some("  ".into()), 7).unwrap();
        assert_eq!(value, 7);
        let value: u32 = parse_value(MAX_CALLS_ENV_VAR, Some(" 12 ".into()), 7).unwrap();
        assert_eq!(value, 12);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let result: Result<u16, _> = parse_value(PORT_ENV_VAR, Some("eighty".into()), 8000);
        match result {
            Err(TaoError::Config(message)) => assert!(message.contains("GATEWAY_PORT=eighty")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_bind_addr() {
        let config = GatewayConfig::default();
        assert_eq!(config.bind_addr().await.unwrap().port(), 8000);
        assert!(matches!(
            config.require_credentials(),
            Err(TaoError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_bind_addr_accepts_hostname() {
        let config = GatewayConfig {
            host: "localhost".to_string(),
            port: 8123,
            ..GatewayConfig::default()
        };
        let addr = config.bind_addr().await.unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8123);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GatewayConfig {
            credentials: Some(Credentials::new("super-secret")),
            ..GatewayConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(config.require_credentials().is_ok());
    }
}
