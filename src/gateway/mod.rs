//! Local HTTP gateway in front of tao.app.
//!
//! Every relayed route goes through one shared [`RateLimitedClient`], so the
//! limit applies to the gateway as a whole rather than per caller.

mod client;
mod handlers;
mod response;

pub use client::GatewayClient;
pub use handlers::RewardsQuery;
pub use response::{Envelope, GatewayError, RateLimitInfo, ValidQuery};

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::TaoError;
use crate::rate_limit::RateLimitedClient;
use crate::rest::TaoRestClient;

/// State shared by all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: RateLimitedClient<TaoRestClient>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Build the upstream client and limiter described by `config`.
    pub fn new(config: GatewayConfig) -> Self {
        let client = RateLimitedClient::new(config.rest_client(), config.rate_limit.clone());
        Self::with_client(client, config)
    }

    /// Use an already built client.
    pub fn with_client(client: RateLimitedClient<TaoRestClient>, config: GatewayConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

/// Build the router with every route, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/status", get(handlers::status))
        .route("/health", get(handlers::health))
        .route("/current", get(handlers::current))
        .route("/subnets", get(handlers::subnets))
        .route("/subnet/{netuid}", get(handlers::subnet_info))
        .route("/subnet-screener", get(handlers::subnet_screener))
        .route("/fear-greed", get(handlers::fear_greed))
        .route("/fear-greed/current", get(handlers::fear_greed_current))
        .route("/price-sustainability", get(handlers::price_sustainability))
        .route("/apy/root", get(handlers::root_apy))
        .route("/apy/alpha/{netuid}", get(handlers::alpha_apy))
        .route("/subnet-holders/{netuid}", get(handlers::subnet_holders))
        .route("/subnet-transactions/{netuid}", get(handlers::subnet_transactions))
        .route("/subnet-ohlc/{netuid}", get(handlers::subnet_ohlc))
        .route("/subnet-valuation/{netuid}", get(handlers::subnet_valuation))
        .route("/subnet-metagraph/{netuid}", get(handlers::subnet_metagraph))
        .route("/subnet-tags", get(handlers::subnet_tags))
        .route("/validator-identities", get(handlers::validator_identities))
        .route("/macro-analytics", get(handlers::macro_analytics))
        .route("/subnet-analytics", get(handlers::subnet_analytics))
        .route("/portfolio/balance", get(handlers::portfolio_balance))
        .route("/portfolio/balance-history", get(handlers::balance_history))
        .route("/portfolio/events", get(handlers::portfolio_events))
        .route("/portfolio/rewards", get(handlers::portfolio_rewards))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the gateway until Ctrl-C.
pub async fn serve(config: GatewayConfig) -> Result<(), TaoError> {
    config.require_credentials()?;
    let addr = config.bind_addr().await?;
    let state = AppState::new(config);

    tracing::info!(
        base_url = %state.config.base_url,
        max_calls = state.config.rate_limit.max_calls,
        window_secs = state.config.rate_limit.window.as_secs(),
        "Starting tao.app gateway"
    );

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
