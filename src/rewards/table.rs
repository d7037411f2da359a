//! Per-snapshot balance history rows.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;

use crate::rewards::{PartitionedSeries, PricingPolicy, Snapshot, TimeRange};

/// One row of the balance history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceRow {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub partition_id: u32,
    pub quantity: f64,
    pub unit_price: f64,
    /// `quantity * unit_price`.
    pub balance_value: f64,
    /// `secondary_value * secondary_price`.
    pub secondary_value_usd: f64,
    pub tao_balance: Option<f64>,
    /// Change since the next older snapshot of the same partition.
    ///
    /// Zero for the oldest snapshot. Negative changes are kept.
    pub reward_quantity: f64,
    pub reward_value: f64,
}

/// Totals under a balance table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub rows: usize,
    pub partitions: usize,
    /// Newest minus oldest quantity, summed once per partition.
    pub total_reward_quantity: f64,
    pub total_reward_value: f64,
    pub total_balance_value: f64,
}

/// Build one row per in-window snapshot, in input order.
pub fn balance_table(
    snapshots: &[Snapshot],
    window: &TimeRange,
    pricing: &PricingPolicy,
) -> Vec<BalanceRow> {
    let in_window: Vec<&Snapshot> = snapshots
        .iter()
        .filter(|s| window.contains(s.timestamp))
        .collect();

    // Input positions per partition, newest first.
    let mut order: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (position, snapshot) in in_window.iter().enumerate() {
        order.entry(snapshot.netuid).or_default().push(position);
    }
    for positions in order.values_mut() {
        positions.sort_by(|a, b| in_window[*b].timestamp.cmp(&in_window[*a].timestamp));
    }

    let mut older: Vec<Option<usize>> = vec![None; in_window.len()];
    for positions in order.values() {
        for pair in positions.windows(2) {
            older[pair[0]] = Some(pair[1]);
        }
    }

    in_window
        .iter()
        .zip(older)
        .map(|(snapshot, older)| {
            let reward_quantity =
                older.map_or(0.0, |i| snapshot.quantity() - in_window[i].quantity());
            BalanceRow {
                timestamp: snapshot.timestamp,
                partition_id: snapshot.netuid,
                quantity: snapshot.quantity(),
                unit_price: snapshot.unit_price(),
                balance_value: snapshot.balance_value(),
                secondary_value_usd: snapshot.secondary_value() * snapshot.secondary_price(),
                tao_balance: snapshot.tao_balance,
                reward_quantity,
                reward_value: pricing.value(reward_quantity, snapshot),
            }
        })
        .collect()
}

/// Summarise the same in-window snapshots as [`balance_table`].
pub fn balance_summary(
    snapshots: &[Snapshot],
    window: &TimeRange,
    pricing: &PricingPolicy,
) -> BalanceSummary {
    let series = PartitionedSeries::within(snapshots, window);
    let mut summary = BalanceSummary {
        rows: series.data_points(),
        partitions: series.len(),
        ..BalanceSummary::default()
    };

    for (_, entries) in series.iter() {
        summary.total_balance_value += entries.iter().map(Snapshot::balance_value).sum::<f64>();
        if let [newest, .., oldest] = entries {
            let delta = newest.quantity() - oldest.quantity();
            summary.total_reward_quantity += delta;
            summary.total_reward_value += pricing.value(delta, newest);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::datetime;

    fn snapshot(netuid: u32, hours: i64, stake: f64) -> Snapshot {
        Snapshot {
            timestamp: datetime!(2025-07-01 00:00 UTC) + Duration::hours(hours),
            netuid,
            stake,
            price: 0.5,
            dtao_value: stake * 0.5,
            tao_price: 300.0,
            tao_balance: Some(1.0),
        }
    }

    #[test]
    fn test_rows_follow_input_order() {
        let snapshots = vec![snapshot(2, 1, 11.0), snapshot(2, 0, 10.0), snapshot(2, 2, 9.0)];
        let rows = balance_table(&snapshots, &TimeRange::all(), &PricingPolicy::standard());

        let rewards: Vec<f64> = rows.iter().map(|r| r.reward_quantity).collect();
        assert_eq!(rewards, vec![1.0, 0.0, -2.0]);
        assert_eq!(rows[0].reward_value, 0.5);
        assert_eq!(rows[2].reward_value, -1.0);
        assert_eq!(rows[0].balance_value, 5.5);
        assert_eq!(rows[0].secondary_value_usd, 11.0 * 0.5 * 300.0);
    }

    #[test]
    fn test_single_snapshot_partition_has_zero_reward() {
        let snapshots = vec![snapshot(0, 0, 3.0), snapshot(5, 0, 4.0), snapshot(5, 1, 6.0)];
        let rows = balance_table(&snapshots, &TimeRange::all(), &PricingPolicy::standard());

        assert_eq!(rows[0].reward_quantity, 0.0);
        assert_eq!(rows[2].reward_quantity, 2.0);
    }

    #[test]
    fn test_summary_counts_each_partition_once() {
        let snapshots = vec![
            snapshot(0, 0, 1.0),
            snapshot(0, 1, 2.0),
            snapshot(0, 2, 3.0),
            snapshot(4, 0, 10.0),
        ];
        let summary = balance_summary(&snapshots, &TimeRange::all(), &PricingPolicy::standard());

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.partitions, 2);
        assert_eq!(summary.total_reward_quantity, 2.0);
        assert_eq!(summary.total_reward_value, 600.0);
        assert_eq!(summary.total_balance_value, 8.0);
    }
}
