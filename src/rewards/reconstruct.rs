//! Reward reconstruction from stake snapshots.
//!
//! Staking rewards are never reported directly; they show up as growth in the
//! staked quantity between consecutive snapshots. Each step's growth is valued
//! at the newer snapshot's price. Decreases (unstaking, slippage) are dropped
//! from the step totals but still move the full-range figure.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::rewards::{PartitionedSeries, PricingPolicy, Snapshot, TimeRange};

/// The valued change in quantity between two snapshots of one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardRecord {
    pub partition_id: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub window_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub window_end: OffsetDateTime,
    pub quantity_delta: f64,
    pub currency_value: f64,
}

impl RewardRecord {
    /// Value the change from `older` to `newer` at the newer snapshot's price.
    fn between(newer: &Snapshot, older: &Snapshot, pricing: &PricingPolicy) -> Self {
        let quantity_delta = newer.quantity() - older.quantity();
        Self {
            partition_id: newer.partition_id(),
            window_start: older.timestamp,
            window_end: newer.timestamp,
            quantity_delta,
            currency_value: pricing.value(quantity_delta, newer),
        }
    }
}

/// Rewards of one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionRewards {
    pub partition_id: u32,
    /// Snapshots that fell inside the window.
    pub snapshot_count: usize,
    /// Oldest to newest, may be negative.
    pub full_range: RewardRecord,
    /// `stake * price` of the newest snapshot minus that of the oldest.
    pub balance_change: f64,
    /// Positive steps only, newest first.
    pub steps: Vec<RewardRecord>,
    /// Value of the most recent step if it was positive, else zero.
    pub hourly_reward: f64,
    /// Sum of all positive steps.
    pub windowed_reward: f64,
}

/// Sums over every partition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WindowTotals {
    /// Sum of full-range rewards.
    pub total_rewards: f64,
    pub balance_change: f64,
    pub hourly_rewards: f64,
    pub windowed_rewards: f64,
    /// Partitions whose most recent step was positive.
    pub hourly_count: usize,
    /// Positive steps across partitions.
    pub windowed_count: usize,
    /// Snapshots inside the window.
    pub data_points: usize,
    /// Partitions with at least one snapshot inside the window.
    pub partitions: usize,
}

/// Output of [`compute_rewards`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewardReport {
    /// Partitions with at least two in-window snapshots, ascending id.
    pub per_partition: Vec<PartitionRewards>,
    pub totals: WindowTotals,
}

impl RewardReport {
    /// Rewards of one partition, if it had enough data.
    pub fn partition(&self, partition_id: u32) -> Option<&PartitionRewards> {
        self.per_partition
            .iter()
            .find(|p| p.partition_id == partition_id)
    }
}

/// Reconstruct rewards from the snapshots inside `window`.
///
/// # Example
///
/// ```rust
/// use tao_income_api::rewards::{compute_rewards, PricingPolicy, Snapshot, TimeRange};
/// use time::macros::datetime;
///
/// let snapshot = |ts, stake| Snapshot {
///     timestamp: ts,
///     netuid: 3,
///     stake,
///     price: 2.0,
///     dtao_value: 0.0,
///     tao_price: 400.0,
///     tao_balance: None,
/// };
/// let snapshots = vec![
///     snapshot(datetime!(2025-07-01 10:00 UTC), 10.0),
///     snapshot(datetime!(2025-07-01 11:00 UTC), 12.5),
/// ];
///
/// let report = compute_rewards(&snapshots, &TimeRange::all(), &PricingPolicy::standard());
/// assert_eq!(report.totals.total_rewards, 5.0);
/// assert_eq!(report.totals.hourly_rewards, 5.0);
/// ```
pub fn compute_rewards(
    snapshots: &[Snapshot],
    window: &TimeRange,
    pricing: &PricingPolicy,
) -> RewardReport {
    let series = PartitionedSeries::within(snapshots, window);
    let mut totals = WindowTotals {
        data_points: series.data_points(),
        partitions: series.len(),
        ..WindowTotals::default()
    };

    let per_partition: Vec<PartitionRewards> = series
        .iter()
        .filter_map(|(partition_id, entries)| partition_rewards(partition_id, entries, pricing))
        .collect();

    for rewards in &per_partition {
        totals.total_rewards += rewards.full_range.currency_value;
        totals.balance_change += rewards.balance_change;
        totals.hourly_rewards += rewards.hourly_reward;
        totals.windowed_rewards += rewards.windowed_reward;
        if rewards.hourly_reward > 0.0 {
            totals.hourly_count += 1;
        }
        totals.windowed_count += rewards.steps.len();
    }

    RewardReport {
        per_partition,
        totals,
    }
}

/// Rewards of one newest-first series, `None` below two snapshots.
fn partition_rewards(
    partition_id: u32,
    entries: &[Snapshot],
    pricing: &PricingPolicy,
) -> Option<PartitionRewards> {
    let (newest, oldest) = match entries {
        [newest, .., oldest] => (newest, oldest),
        _ => return None,
    };

    let steps: Vec<RewardRecord> = entries
        .windows(2)
        .map(|pair| RewardRecord::between(&pair[0], &pair[1], pricing))
        .filter(|record| record.currency_value > 0.0)
        .collect();

    // Only the latest step counts, and only if it was positive.
    let latest = RewardRecord::between(newest, &entries[1], pricing).currency_value;
    let hourly_reward = if latest > 0.0 { latest } else { 0.0 };
    let windowed_reward = steps.iter().map(|record| record.currency_value).sum();

    Some(PartitionRewards {
        partition_id,
        snapshot_count: entries.len(),
        full_range: RewardRecord::between(newest, oldest, pricing),
        balance_change: newest.balance_value() - oldest.balance_value(),
        steps,
        hourly_reward,
        windowed_reward,
    })
}

/// Output of [`rolling_rewards`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RollingRewards {
    pub per_partition: BTreeMap<u32, f64>,
    pub total: f64,
}

/// Sum every positive step that ended within `lookback` of its partition's
/// newest snapshot.
///
/// Unlike the hourly figure of [`compute_rewards`], which only looks at the
/// single most recent step, this counts all steps in the trailing period, so
/// the two disagree whenever snapshots are denser than the lookback.
pub fn rolling_rewards(
    snapshots: &[Snapshot],
    lookback: Duration,
    pricing: &PricingPolicy,
) -> RollingRewards {
    let series = PartitionedSeries::from_snapshots(snapshots);
    let mut rolling = RollingRewards::default();

    for (partition_id, entries) in series.iter() {
        let Some(newest) = entries.first() else {
            continue;
        };
        if entries.len() < 2 {
            continue;
        }
        let cutoff = newest.timestamp.checked_sub(lookback);
        let reward: f64 = entries
            .windows(2)
            .take_while(|pair| cutoff.is_none_or(|cutoff| pair[0].timestamp >= cutoff))
            .map(|pair| RewardRecord::between(&pair[0], &pair[1], pricing).currency_value)
            .filter(|value| *value > 0.0)
            .sum();

        rolling.per_partition.insert(partition_id, reward);
        rolling.total += reward;
    }

    rolling
}
