//! Rate-limited client wrapper.
//!
//! Wraps any [`TaoClient`] so that every relayed call first passes the
//! gateway's trailing-window limiter. Calls over the limit fail fast with
//! [`TaoError::RateLimitExceeded`] and never reach the upstream API.
//!
//! # Example
//!
//! ```rust,ignore
//! use tao_income_api::rate_limit::{RateLimitConfig, RateLimitedClient};
//! use tao_income_api::rest::TaoRestClient;
//!
//! let client = TaoRestClient::new();
//! let limited = RateLimitedClient::new(client, RateLimitConfig::default());
//!
//! let current = limited.current().await?;
//! let status = limited.status().await;
//! println!("{} calls left", status.calls_remaining);
//! ```

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::TaoError;
use crate::rate_limit::{CallWindow, Clock, RateLimitConfig, SystemClock};
use crate::rest::TaoClient;
use crate::rest::types::{
    BalanceHistoryRequest, DateRangeRequest, MacroAnalyticsRequest, MetagraphRequest,
    NetuidFilter, PortfolioEventsRequest, RootApyRequest, SubnetAnalyticsRequest,
    SubnetOhlcRequest, SubnetPageRequest, SubnetTransactionsRequest,
};

/// Point-in-time view of the limiter, as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    /// Maximum calls per window.
    pub max_calls: u32,
    /// Window length in seconds.
    pub time_window_seconds: u64,
    /// Calls counted in the current window.
    pub calls_made: u32,
    /// Calls still allowed in the current window.
    pub calls_remaining: u32,
}

/// A rate-limited wrapper around any [`TaoClient`] implementation.
///
/// Clones share the same call record, so one limiter can guard a whole
/// gateway.
pub struct RateLimitedClient<C> {
    inner: C,
    config: RateLimitConfig,
    limiter: Arc<Mutex<CallWindow>>,
}

impl<C> RateLimitedClient<C> {
    /// Create a new rate-limited client wrapper on the system clock.
    pub fn new(inner: C, config: RateLimitConfig) -> Self {
        Self::with_clock(inner, config, Arc::new(SystemClock))
    }

    /// Create a new rate-limited client wrapper on the given clock.
    pub fn with_clock(inner: C, config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let limiter = CallWindow::with_clock(config.window, config.max_calls, clock);
        Self {
            inner,
            config,
            limiter: Arc::new(Mutex::new(limiter)),
        }
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// Get the current configuration.
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Enable or disable rate limiting.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// Current limiter counters.
    pub async fn status(&self) -> RateLimitStatus {
        let limiter = self.limiter.lock().await;
        RateLimitStatus {
            max_calls: limiter.max_calls(),
            time_window_seconds: limiter.window().as_secs(),
            calls_made: limiter.calls_made(),
            calls_remaining: limiter.remaining(),
        }
    }

    /// Admit one call or reject it.
    ///
    /// Eviction, check and record happen under a single lock.
    async fn admit(&self) -> Result<(), TaoError> {
        if !self.config.enabled {
            return Ok(());
        }

        let mut limiter = self.limiter.lock().await;
        match limiter.try_acquire() {
            Ok(()) => Ok(()),
            Err(wait_time) => {
                tracing::warn!(
                    max_calls = limiter.max_calls(),
                    retry_after_ms = wait_time.as_millis() as u64,
                    "Rate limit exceeded"
                );
                Err(TaoError::RateLimitExceeded {
                    retry_after_ms: Some(wait_time.as_millis() as u64),
                })
            }
        }
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for RateLimitedClient<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedClient")
            .field("inner", &self.inner)
            .field("config", &self.config)
            .finish()
    }
}

impl<C: Clone> Clone for RateLimitedClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            config: self.config.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

// TaoClient Trait Implementation

impl<C: TaoClient> TaoClient for RateLimitedClient<C> {
    // ========== Market ==========

    async fn current(&self) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.current().await
    }

    async fn subnet_screener(&self) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_screener().await
    }

    async fn fear_greed(&self, request: &DateRangeRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.fear_greed(request).await
    }

    async fn fear_greed_current(&self) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.fear_greed_current().await
    }

    async fn price_sustainability(&self, request: &NetuidFilter) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.price_sustainability(request).await
    }

    async fn root_apy(&self, request: &RootApyRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.root_apy(request).await
    }

    async fn alpha_apy(&self, request: &SubnetPageRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.alpha_apy(request).await
    }

    async fn macro_analytics(&self, request: &MacroAnalyticsRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.macro_analytics(request).await
    }

    async fn validator_identities(&self) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.validator_identities().await
    }

    // ========== Subnets ==========

    async fn subnets(&self) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnets().await
    }

    async fn subnet_info(&self, netuid: u32) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_info(netuid).await
    }

    async fn subnet_holders(&self, netuid: u32) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_holders(netuid).await
    }

    async fn subnet_transactions(
        &self,
        request: &SubnetTransactionsRequest,
    ) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_transactions(request).await
    }

    async fn subnet_ohlc(&self, request: &SubnetOhlcRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_ohlc(request).await
    }

    async fn subnet_valuation(&self, request: &SubnetPageRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_valuation(request).await
    }

    async fn subnet_metagraph(
        &self,
        netuid: u32,
        request: &MetagraphRequest,
    ) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_metagraph(netuid, request).await
    }

    async fn subnet_tags(&self) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_tags().await
    }

    async fn subnet_analytics(
        &self,
        request: &SubnetAnalyticsRequest,
    ) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.subnet_analytics(request).await
    }

    // ========== Portfolio ==========

    async fn portfolio_balance(&self, coldkey: &str) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.portfolio_balance(coldkey).await
    }

    async fn balance_history(&self, request: &BalanceHistoryRequest) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.balance_history(request).await
    }

    async fn portfolio_events(
        &self,
        request: &PortfolioEventsRequest,
    ) -> Result<Value, TaoError> {
        self.admit().await?;
        self.inner.portfolio_events(request).await
    }
}
