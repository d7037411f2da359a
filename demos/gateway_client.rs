//! Example: Reading a portfolio through a running gateway.
//!
//! Start the gateway first (`tao-income serve`), then:
//!
//! Run with: TAO_COLDKEY=5H... cargo run --example gateway_client

use tao_income_api::TaoError;
use tao_income_api::gateway::GatewayClient;
use tao_income_api::rewards::{PricingPolicy, TimeRange, compute_rewards, coverage};
use time::{Duration, OffsetDateTime};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let coldkey = std::env::var("TAO_COLDKEY")?;
    let gateway_url =
        std::env::var("TAO_GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let client = GatewayClient::new(gateway_url);

    println!("=== Fear & Greed ===");
    let index = client.get("/fear-greed/current", &[]).await?;
    println!("{}", serde_json::to_string_pretty(&index)?);

    println!("\n=== Portfolio ===");
    let snapshots = match client.portfolio_snapshots(&coldkey).await {
        Ok(snapshots) => snapshots,
        Err(TaoError::RateLimitExceeded { .. }) => {
            println!("Gateway is rate limited, try again shortly");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let now = OffsetDateTime::now_utc();
    let report = coverage(&snapshots, now, Duration::hours(48));
    println!(
        "{} snapshots, {} unique timestamps, suitable: {}",
        report.data_points, report.unique_timestamps, report.suitable
    );

    let window = TimeRange::trailing(now, Duration::hours(24));
    let rewards = compute_rewards(&snapshots, &window, &PricingPolicy::standard());
    println!("Rewards over the past 24h: {:.6}", rewards.totals.total_rewards);
    Ok(())
}
