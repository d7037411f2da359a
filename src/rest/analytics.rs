//! Market and subnet analytics endpoints.

use serde_json::Value;

use crate::error::TaoError;
use crate::rest::TaoRestClient;
use crate::rest::endpoints::{market, subnets};
use crate::rest::types::{
    DateRangeRequest, MacroAnalyticsRequest, MetagraphRequest, NetuidFilter, NetuidRequest,
    RootApyRequest, SubnetAnalyticsRequest, SubnetOhlcRequest, SubnetPageRequest,
    SubnetTransactionsRequest,
};

impl TaoRestClient {
    /// Get the current network snapshot.
    pub async fn current(&self) -> Result<Value, TaoError> {
        self.get(market::CURRENT).await
    }

    /// Get subnet screener data.
    pub async fn subnet_screener(&self) -> Result<Value, TaoError> {
        self.get(market::SUBNET_SCREENER).await
    }

    /// Get fear & greed index history, optionally bounded by date.
    pub async fn fear_greed(&self, request: &DateRangeRequest) -> Result<Value, TaoError> {
        self.get_with_params(market::FEAR_GREED, request).await
    }

    /// Get the current fear & greed index.
    pub async fn fear_greed_current(&self) -> Result<Value, TaoError> {
        self.get(market::FEAR_GREED_CURRENT).await
    }

    /// Get price sustainability data, optionally for one subnet.
    pub async fn price_sustainability(&self, request: &NetuidFilter) -> Result<Value, TaoError> {
        self.get_with_params(market::PRICE_SUSTAINABILITY, request)
            .await
    }

    /// Get the estimated root APY.
    pub async fn root_apy(&self, request: &RootApyRequest) -> Result<Value, TaoError> {
        self.get_with_params(market::ROOT_APY, request).await
    }

    /// Get the alpha APY of a subnet.
    pub async fn alpha_apy(&self, request: &SubnetPageRequest) -> Result<Value, TaoError> {
        self.get_with_params(market::ALPHA_APY, request).await
    }

    /// Get aggregated macro analytics.
    pub async fn macro_analytics(
        &self,
        request: &MacroAnalyticsRequest,
    ) -> Result<Value, TaoError> {
        self.get_with_params(market::MACRO_AGGREGATED, request).await
    }

    /// Get validator identities.
    pub async fn validator_identities(&self) -> Result<Value, TaoError> {
        self.get(market::VALIDATOR_IDENTITIES).await
    }

    /// Get information about all subnets.
    pub async fn subnets(&self) -> Result<Value, TaoError> {
        self.get(subnets::INFO).await
    }

    /// Get information about one subnet.
    pub async fn subnet_info(&self, netuid: u32) -> Result<Value, TaoError> {
        self.get(&subnets::info(netuid)).await
    }

    /// Get the holders of a subnet.
    pub async fn subnet_holders(&self, netuid: u32) -> Result<Value, TaoError> {
        self.get_with_params(subnets::HOLDERS, &NetuidRequest { netuid })
            .await
    }

    /// Get subnet transactions.
    pub async fn subnet_transactions(
        &self,
        request: &SubnetTransactionsRequest,
    ) -> Result<Value, TaoError> {
        self.get_with_params(subnets::TRANSACTIONS, request).await
    }

    /// Get subnet OHLC candles.
    pub async fn subnet_ohlc(&self, request: &SubnetOhlcRequest) -> Result<Value, TaoError> {
        self.get_with_params(subnets::OHLC, request).await
    }

    /// Get subnet valuation data.
    pub async fn subnet_valuation(&self, request: &SubnetPageRequest) -> Result<Value, TaoError> {
        self.get_with_params(subnets::VALUATION, request).await
    }

    /// Get a subnet metagraph, optionally at a historical timestamp.
    pub async fn subnet_metagraph(
        &self,
        netuid: u32,
        request: &MetagraphRequest,
    ) -> Result<Value, TaoError> {
        self.get_with_params(&subnets::metagraph(netuid), request)
            .await
    }

    /// Get subnet tags.
    pub async fn subnet_tags(&self) -> Result<Value, TaoError> {
        self.get(subnets::TAGS).await
    }

    /// Get aggregated subnet analytics.
    pub async fn subnet_analytics(
        &self,
        request: &SubnetAnalyticsRequest,
    ) -> Result<Value, TaoError> {
        self.get_with_params(subnets::AGGREGATED, request).await
    }
}
