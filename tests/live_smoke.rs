use std::sync::Arc;

use tao_income_api::auth::EnvCredentials;
use tao_income_api::rest::TaoRestClient;
use tao_income_api::rewards::{PricingPolicy, TimeRange, compute_rewards, parse_snapshots};

fn live_tests_enabled() -> bool {
    std::env::var("TAO_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_market_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let credentials = match EnvCredentials::try_from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = TaoRestClient::builder()
        .credentials(Arc::new(credentials))
        .build();

    let current = client.current().await?;
    assert!(!current.is_null());

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_portfolio_rewards_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let (credentials, coldkey) = match (
        EnvCredentials::try_from_env(),
        std::env::var("TAO_COLDKEY").ok(),
    ) {
        (Some(creds), Some(coldkey)) => (creds, coldkey),
        _ => return Ok(()),
    };
    let client = TaoRestClient::builder()
        .credentials(Arc::new(credentials))
        .build();

    let balance = client.portfolio_balance(&coldkey).await?;
    let snapshots = parse_snapshots(&balance)?;
    let report = compute_rewards(&snapshots, &TimeRange::all(), &PricingPolicy::standard());
    assert_eq!(report.totals.data_points, snapshots.len());

    Ok(())
}
