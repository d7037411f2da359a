//! Example: Reconstructing staking rewards from balance snapshots.
//!
//! Works offline on a handful of made-up snapshots.
//!
//! Run with: cargo run --example rewards

use std::time::Duration as StdDuration;

use tao_income_api::rate_limit::CallWindow;
use tao_income_api::rewards::{
    PricingPolicy, Snapshot, TimeRange, balance_summary, compute_rewards, rolling_rewards,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

fn snapshot(timestamp: OffsetDateTime, netuid: u32, stake: f64, price: f64) -> Snapshot {
    Snapshot {
        timestamp,
        netuid,
        stake,
        price,
        dtao_value: stake * price,
        tao_price: 420.0,
        tao_balance: None,
    }
}

fn main() {
    let now = datetime!(2025-07-02 12:00 UTC);
    let snapshots = vec![
        snapshot(now - Duration::hours(3), 0, 100.0, 1.0),
        snapshot(now - Duration::hours(2), 0, 100.4, 1.0),
        snapshot(now - Duration::hours(1), 0, 100.9, 1.0),
        snapshot(now - Duration::hours(2), 19, 250.0, 0.031),
        snapshot(now - Duration::hours(1), 19, 249.5, 0.031),
        snapshot(now, 19, 253.0, 0.032),
    ];

    let pricing = PricingPolicy::standard();
    let window = TimeRange::trailing(now, Duration::hours(24));
    let report = compute_rewards(&snapshots, &window, &pricing);

    println!("=== Per subnet ===");
    for partition in &report.per_partition {
        println!(
            "subnet {}: snapshots={}, total={:.6}, last step={:.6}, window={:.6}",
            partition.partition_id,
            partition.snapshot_count,
            partition.full_range.currency_value,
            partition.hourly_reward,
            partition.windowed_reward,
        );
    }

    println!("\n=== Totals ===");
    println!("Total rewards: {:.6}", report.totals.total_rewards);
    println!("Past hour (last step): {:.6}", report.totals.hourly_rewards);
    let rolling = rolling_rewards(&snapshots, Duration::hours(1), &pricing);
    println!("Past hour (rolling): {:.6}", rolling.total);

    let usd = compute_rewards(&snapshots, &window, &PricingPolicy::usd());
    println!("Total rewards in USD: {:.2}", usd.totals.total_rewards);

    let summary = balance_summary(&snapshots, &window, &pricing);
    println!("Balance value: {:.6} over {} rows", summary.total_balance_value, summary.rows);

    // The gateway allows 10 upstream calls per minute by default.
    println!("\n=== Call window ===");
    let mut calls = CallWindow::new(StdDuration::from_secs(60), 2);
    println!("Call #1 allowed: {}", calls.attempt());
    println!("Call #2 allowed: {}", calls.attempt());
    println!("Call #3 allowed: {}", calls.attempt());
    println!("Retry after: {:?}", calls.retry_after());
}
