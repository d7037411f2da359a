//! Trait definition for the tao.app REST API client.
//!
//! The `TaoClient` trait abstracts every upstream operation the gateway
//! relays. This enables:
//! - Mock implementations for testing
//! - Decorator pattern (the rate limiting wrapper)
//!
//! Responses are relayed as raw JSON; only the analysis code gives the
//! portfolio balance a typed shape.

use std::future::Future;

use serde_json::Value;

use crate::error::TaoError;
use crate::rest::types::{
    BalanceHistoryRequest, DateRangeRequest, MacroAnalyticsRequest, MetagraphRequest,
    NetuidFilter, PortfolioEventsRequest, RootApyRequest, SubnetAnalyticsRequest,
    SubnetOhlcRequest, SubnetPageRequest, SubnetTransactionsRequest,
};

/// Trait defining all relayed tao.app operations.
///
/// All methods are async and return `Result<Value, TaoError>`.
pub trait TaoClient: Send + Sync {
    // ========== Market ==========

    /// Get the current network snapshot.
    fn current(&self) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get subnet screener data.
    fn subnet_screener(&self) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get fear & greed index history.
    fn fear_greed(
        &self,
        request: &DateRangeRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get the current fear & greed index.
    fn fear_greed_current(&self) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get price sustainability data.
    fn price_sustainability(
        &self,
        request: &NetuidFilter,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get the estimated root APY.
    fn root_apy(
        &self,
        request: &RootApyRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get the alpha APY of a subnet.
    fn alpha_apy(
        &self,
        request: &SubnetPageRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get aggregated macro analytics.
    fn macro_analytics(
        &self,
        request: &MacroAnalyticsRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get validator identities.
    fn validator_identities(&self) -> impl Future<Output = Result<Value, TaoError>> + Send;

    // ========== Subnets ==========

    /// Get information about all subnets.
    fn subnets(&self) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get information about one subnet.
    fn subnet_info(&self, netuid: u32) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get the holders of a subnet.
    fn subnet_holders(&self, netuid: u32)
    -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get subnet transactions.
    fn subnet_transactions(
        &self,
        request: &SubnetTransactionsRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get subnet OHLC candles.
    fn subnet_ohlc(
        &self,
        request: &SubnetOhlcRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get subnet valuation data.
    fn subnet_valuation(
        &self,
        request: &SubnetPageRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get a subnet metagraph.
    fn subnet_metagraph(
        &self,
        netuid: u32,
        request: &MetagraphRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get subnet tags.
    fn subnet_tags(&self) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get aggregated subnet analytics.
    fn subnet_analytics(
        &self,
        request: &SubnetAnalyticsRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    // ========== Portfolio ==========

    /// Get the current portfolio balance snapshots of a coldkey.
    fn portfolio_balance(
        &self,
        coldkey: &str,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get the portfolio balance history of a coldkey.
    fn balance_history(
        &self,
        request: &BalanceHistoryRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;

    /// Get the portfolio events of a coldkey.
    fn portfolio_events(
        &self,
        request: &PortfolioEventsRequest,
    ) -> impl Future<Output = Result<Value, TaoError>> + Send;
}
