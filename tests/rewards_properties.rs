use serde_json::{Value, json};
use time::Duration;
use time::macros::datetime;

use tao_income_api::TaoError;
use tao_income_api::rewards::{
    PricingPolicy, TimeRange, balance_table, compute_rewards, coverage, parse_snapshots,
    rolling_rewards,
};

fn entry(timestamp: &str, netuid: u32, stake: f64, price: f64) -> Value {
    json!({
        "timestamp": timestamp,
        "netuid": netuid,
        "stake": stake,
        "price": price,
        "dtao_value": stake * price,
        "tao_price": 250.0,
        "tao_balance": null
    })
}

fn portfolio() -> Value {
    json!([
        entry("2025-07-01T10:00:00Z", 0, 100.0, 1.0),
        entry("2025-07-01T11:00:00Z", 0, 100.5, 1.0),
        entry("2025-07-01T12:00:00Z", 0, 101.0, 1.0),
        entry("2025-07-01T10:00:00Z", 19, 40.0, 0.02),
        entry("2025-07-01T11:00:00Z", 19, 38.0, 0.02),
        entry("2025-07-01T12:00:00Z", 19, 41.0, 0.03),
        entry("2025-07-01T12:00:00Z", 64, 7.0, 0.5),
    ])
}

#[test]
fn test_full_pipeline_from_json() {
    let snapshots = parse_snapshots(&portfolio()).unwrap();
    let report = compute_rewards(&snapshots, &TimeRange::all(), &PricingPolicy::standard());

    assert_eq!(report.totals.data_points, 7);
    assert_eq!(report.totals.partitions, 3);
    assert_eq!(report.per_partition.len(), 2);

    let root = report.partition(0).unwrap();
    assert_eq!(root.full_range.quantity_delta, 1.0);
    assert_eq!(root.full_range.currency_value, 250.0);
    assert_eq!(root.windowed_reward, 250.0);

    // The dip at 11:00 is dropped from the steps but not from the full range.
    let subnet = report.partition(19).unwrap();
    assert_eq!(subnet.steps.len(), 1);
    assert!((subnet.windowed_reward - 0.09).abs() < 1e-9);
    assert!((subnet.full_range.currency_value - 0.03).abs() < 1e-9);

    assert!(report.partition(64).is_none());
}

#[test]
fn test_window_excludes_older_snapshots() {
    let snapshots = parse_snapshots(&portfolio()).unwrap();
    let window = TimeRange::trailing(datetime!(2025-07-01 12:00 UTC), Duration::hours(1));
    let report = compute_rewards(&snapshots, &window, &PricingPolicy::standard());

    assert_eq!(report.totals.data_points, 5);
    let subnet = report.partition(19).unwrap();
    assert_eq!(subnet.snapshot_count, 2);
    assert_eq!(subnet.full_range.quantity_delta, 3.0);
}

#[test]
fn test_hourly_is_latest_step_only() {
    let snapshots = parse_snapshots(&portfolio()).unwrap();
    let policy = PricingPolicy::standard();
    let report = compute_rewards(&snapshots, &TimeRange::all(), &policy);
    let rolling = rolling_rewards(&snapshots, Duration::hours(2), &policy);

    assert_eq!(report.partition(0).unwrap().hourly_reward, 125.0);
    assert_eq!(rolling.per_partition[&0], 250.0);
    assert!(rolling.total > report.totals.hourly_rewards);
}

#[test]
fn test_balance_table_matches_input() {
    let snapshots = parse_snapshots(&portfolio()).unwrap();
    let rows = balance_table(&snapshots, &TimeRange::all(), &PricingPolicy::standard());

    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].reward_quantity, 0.0);
    assert_eq!(rows[4].reward_quantity, -2.0);
    assert_eq!(rows[6].reward_quantity, 0.0);
}

#[test]
fn test_coverage_of_portfolio() {
    let snapshots = parse_snapshots(&portfolio()).unwrap();
    let report = coverage(&snapshots, datetime!(2025-07-02 00:00 UTC), Duration::hours(24));

    assert_eq!(report.unique_timestamps, 3);
    assert_eq!(report.per_partition.len(), 3);
    assert!(report.suitable);
}

#[test]
fn test_non_array_rejected() {
    let err = parse_snapshots(&json!({ "detail": "nope" })).unwrap_err();
    assert!(matches!(err, TaoError::Validation(_)));
}

#[test]
fn test_repeat_runs_identical() {
    let snapshots = parse_snapshots(&portfolio()).unwrap();
    let policy = PricingPolicy::usd();
    let first = compute_rewards(&snapshots, &TimeRange::all(), &policy);
    let second = compute_rewards(&snapshots, &TimeRange::all(), &policy);
    assert_eq!(first, second);
}
