//! Route handlers.
//!
//! Relay handlers forward one call through the rate-limited client and wrap
//! the upstream JSON in an [`Envelope`]. Route path parameters take precedence
//! over a `netuid` given in the query string.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use time::OffsetDateTime;

use crate::error::TaoError;
use crate::gateway::AppState;
use crate::gateway::response::{Envelope, GatewayError, ValidQuery};
use crate::rest::TaoClient;
use crate::rest::types::{
    BalanceHistoryRequest, ColdkeyRequest, DateRangeRequest, MacroAnalyticsRequest,
    MetagraphRequest, NetuidFilter, PortfolioEventsRequest, RootApyRequest,
    SubnetAnalyticsRequest, SubnetOhlcRequest, SubnetPageRequest, SubnetTransactionsRequest,
};
use crate::rewards::{PricingPolicy, RewardReport, TimeRange, compute_rewards, parse_snapshots};

type Relayed<T = Value> = Result<Json<Envelope<T>>, GatewayError>;

/// Route catalogue served at `/`.
const ROUTES: &[(&str, &str)] = &[
    ("/status", "Check API status and rate limit info"),
    ("/health", "Liveness check"),
    ("/current", "Get current tao.app data"),
    ("/subnets", "Get all subnets information"),
    ("/subnet/{netuid}", "Get specific subnet information"),
    ("/subnet-screener", "Get subnet screener data"),
    ("/fear-greed", "Get fear & greed index data"),
    ("/fear-greed/current", "Get current fear & greed index"),
    ("/price-sustainability", "Get price sustainability data"),
    ("/apy/root", "Get estimated root APY"),
    ("/apy/alpha/{netuid}", "Get alpha APY for subnet"),
    ("/subnet-holders/{netuid}", "Get subnet holders"),
    ("/subnet-transactions/{netuid}", "Get subnet transactions"),
    ("/subnet-ohlc/{netuid}", "Get subnet OHLC data"),
    ("/subnet-valuation/{netuid}", "Get subnet valuation data"),
    ("/subnet-metagraph/{netuid}", "Get subnet metagraph"),
    ("/subnet-tags", "Get subnet tags"),
    ("/validator-identities", "Get validator identities"),
    ("/macro-analytics", "Get aggregated macro analytics"),
    ("/subnet-analytics", "Get aggregated subnet analytics"),
    ("/portfolio/balance", "Get current portfolio balance"),
    ("/portfolio/balance-history", "Get portfolio balance history"),
    ("/portfolio/events", "Get portfolio events"),
    ("/portfolio/rewards", "Reconstruct staking rewards from the portfolio balance"),
];

/// Wrap a finished call in the envelope, or attach the limit to its error.
async fn relay<T>(state: &AppState, result: Result<T, TaoError>) -> Relayed<T> {
    match result {
        Ok(data) => Ok(Json(Envelope::ok(data, state.client.status().await))),
        Err(error) => Err(GatewayError::from(error).with_limit(state.client.config().max_calls)),
    }
}

pub async fn root() -> Json<Value> {
    let endpoints: serde_json::Map<String, Value> = ROUTES
        .iter()
        .map(|(route, description)| (route.to_string(), Value::from(*description)))
        .collect();
    Json(json!({
        "message": "Tao Income Tracking API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": endpoints,
    }))
}

pub async fn status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "api_status": "running",
        "rate_limit": state.client.status().await,
        "tao_api_key_configured": state.client.inner().has_credentials(),
    }))
}

pub async fn health() -> Json<Value> {
    let now = OffsetDateTime::now_utc();
    let timestamp = now.unix_timestamp() as f64 + f64::from(now.nanosecond()) / 1e9;
    Json(json!({ "status": "healthy", "timestamp": timestamp }))
}

// ========== Market ==========

pub async fn current(State(state): State<AppState>) -> Relayed {
    relay(&state, state.client.current().await).await
}

pub async fn subnet_screener(State(state): State<AppState>) -> Relayed {
    relay(&state, state.client.subnet_screener().await).await
}

pub async fn fear_greed(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<DateRangeRequest>,
) -> Relayed {
    relay(&state, state.client.fear_greed(&request).await).await
}

pub async fn fear_greed_current(State(state): State<AppState>) -> Relayed {
    relay(&state, state.client.fear_greed_current().await).await
}

pub async fn price_sustainability(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<NetuidFilter>,
) -> Relayed {
    relay(&state, state.client.price_sustainability(&request).await).await
}

pub async fn root_apy(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<RootApyRequest>,
) -> Relayed {
    relay(&state, state.client.root_apy(&request).await).await
}

pub async fn alpha_apy(
    State(state): State<AppState>,
    Path(netuid): Path<u32>,
    ValidQuery(request): ValidQuery<SubnetPageRequest>,
) -> Relayed {
    let request = SubnetPageRequest { netuid, ..request };
    relay(&state, state.client.alpha_apy(&request).await).await
}

pub async fn macro_analytics(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<MacroAnalyticsRequest>,
) -> Relayed {
    relay(&state, state.client.macro_analytics(&request).await).await
}

pub async fn validator_identities(State(state): State<AppState>) -> Relayed {
    relay(&state, state.client.validator_identities().await).await
}

// ========== Subnets ==========

pub async fn subnets(State(state): State<AppState>) -> Relayed {
    relay(&state, state.client.subnets().await).await
}

pub async fn subnet_info(State(state): State<AppState>, Path(netuid): Path<u32>) -> Relayed {
    relay(&state, state.client.subnet_info(netuid).await).await
}

pub async fn subnet_holders(State(state): State<AppState>, Path(netuid): Path<u32>) -> Relayed {
    relay(&state, state.client.subnet_holders(netuid).await).await
}

pub async fn subnet_transactions(
    State(state): State<AppState>,
    Path(netuid): Path<u32>,
    ValidQuery(request): ValidQuery<SubnetTransactionsRequest>,
) -> Relayed {
    let request = SubnetTransactionsRequest { netuid, ..request };
    relay(&state, state.client.subnet_transactions(&request).await).await
}

pub async fn subnet_ohlc(
    State(state): State<AppState>,
    Path(netuid): Path<u32>,
    ValidQuery(request): ValidQuery<SubnetOhlcRequest>,
) -> Relayed {
    let request = SubnetOhlcRequest { netuid, ..request };
    relay(&state, state.client.subnet_ohlc(&request).await).await
}

pub async fn subnet_valuation(
    State(state): State<AppState>,
    Path(netuid): Path<u32>,
    ValidQuery(request): ValidQuery<SubnetPageRequest>,
) -> Relayed {
    let request = SubnetPageRequest { netuid, ..request };
    relay(&state, state.client.subnet_valuation(&request).await).await
}

pub async fn subnet_metagraph(
    State(state): State<AppState>,
    Path(netuid): Path<u32>,
    ValidQuery(request): ValidQuery<MetagraphRequest>,
) -> Relayed {
    relay(&state, state.client.subnet_metagraph(netuid, &request).await).await
}

pub async fn subnet_tags(State(state): State<AppState>) -> Relayed {
    relay(&state, state.client.subnet_tags().await).await
}

pub async fn subnet_analytics(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<SubnetAnalyticsRequest>,
) -> Relayed {
    relay(&state, state.client.subnet_analytics(&request).await).await
}

// ========== Portfolio ==========

pub async fn portfolio_balance(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<ColdkeyRequest>,
) -> Relayed {
    relay(&state, state.client.portfolio_balance(&request.coldkey).await).await
}

pub async fn balance_history(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<BalanceHistoryRequest>,
) -> Relayed {
    relay(&state, state.client.balance_history(&request).await).await
}

pub async fn portfolio_events(
    State(state): State<AppState>,
    ValidQuery(request): ValidQuery<PortfolioEventsRequest>,
) -> Relayed {
    relay(&state, state.client.portfolio_events(&request).await).await
}

fn default_hours() -> u32 {
    24
}

/// Query of `/portfolio/rewards`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardsQuery {
    pub coldkey: String,
    /// Trailing window length.
    #[serde(default = "default_hours")]
    pub hours: u32,
}

pub async fn portfolio_rewards(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<RewardsQuery>,
) -> Relayed<RewardReport> {
    let result: Result<RewardReport, TaoError> = async {
        // Validated before any upstream call.
        let window = TimeRange::checked_trailing(
            OffsetDateTime::now_utc(),
            time::Duration::hours(i64::from(query.hours)),
        )
        .ok_or_else(|| TaoError::Validation(format!("hours={} is out of range", query.hours)))?;
        let balance = state.client.portfolio_balance(&query.coldkey).await?;
        let snapshots = parse_snapshots(&balance)?;
        tracing::debug!(
            coldkey = %query.coldkey,
            snapshots = snapshots.len(),
            hours = query.hours,
            "Reconstructing rewards"
        );
        Ok(compute_rewards(&snapshots, &window, &PricingPolicy::standard()))
    }
    .await;
    relay(&state, result).await
}
