//! # tao-income-api
//!
//! A rate-limited local gateway for the [tao.app](https://tao.app) analytics
//! API, plus tools that reconstruct staking rewards from portfolio balance
//! snapshots.
//!
//! ## Features
//!
//! - Typed client for the tao.app REST endpoints the gateway relays
//! - Trailing-window rate limiting shared by every gateway route
//! - Reward reconstruction per subnet with pluggable pricing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tao_income_api::rest::TaoRestClient;
//! use tao_income_api::rewards::{compute_rewards, parse_snapshots, PricingPolicy, TimeRange};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TaoRestClient::new();
//!     let balance = client.portfolio_balance("5H6Hecx18JknhSubE2ewEJMvHb2N5TL1LVYXL6EENoCoLHW2").await?;
//!     let snapshots = parse_snapshots(&balance)?;
//!     let report = compute_rewards(&snapshots, &TimeRange::all(), &PricingPolicy::standard());
//!     println!("Total rewards: {}", report.totals.total_rewards);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod rate_limit;
pub mod rest;
pub mod rewards;

pub use error::TaoError;

/// Result type alias using TaoError
pub type Result<T> = std::result::Result<T, TaoError>;
