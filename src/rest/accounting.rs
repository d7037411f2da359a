//! Portfolio and accounting endpoints.

use serde_json::Value;

use crate::error::TaoError;
use crate::rest::TaoRestClient;
use crate::rest::endpoints::portfolio;
use crate::rest::types::{BalanceHistoryRequest, ColdkeyRequest, PortfolioEventsRequest};

impl TaoRestClient {
    /// Get the current portfolio balance of a coldkey.
    ///
    /// The answer is a list of per-subnet balance snapshots; see
    /// [`parse_snapshots`](crate::rewards::parse_snapshots) for a typed view.
    pub async fn portfolio_balance(&self, coldkey: &str) -> Result<Value, TaoError> {
        self.get_with_params(portfolio::BALANCE, &ColdkeyRequest::new(coldkey))
            .await
    }

    /// Get the portfolio balance history of a coldkey.
    pub async fn balance_history(
        &self,
        request: &BalanceHistoryRequest,
    ) -> Result<Value, TaoError> {
        self.get_with_params(portfolio::BALANCE_HISTORY, request)
            .await
    }

    /// Get the portfolio events of a coldkey.
    pub async fn portfolio_events(
        &self,
        request: &PortfolioEventsRequest,
    ) -> Result<Value, TaoError> {
        self.get_with_params(portfolio::EVENTS, request).await
    }
}
