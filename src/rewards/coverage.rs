//! Data coverage diagnostics.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use time::{Duration, OffsetDateTime};

use crate::rewards::Snapshot;

/// Snapshot coverage of one partition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionCoverage {
    pub data_points: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub first: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub last: OffsetDateTime,
}

/// How much history a batch of snapshots covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Coverage {
    pub data_points: usize,
    pub unique_timestamps: usize,
    #[serde(with = "time::serde::rfc3339::option")]
    pub first: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last: Option<OffsetDateTime>,
    pub per_partition: BTreeMap<u32, PartitionCoverage>,
    /// Unique timestamps at or after `now - recent`.
    pub recent_timestamps: usize,
    /// Whether any data is recent enough to compute rewards from.
    pub suitable: bool,
}

/// Describe the coverage of `snapshots` relative to `now`.
pub fn coverage(snapshots: &[Snapshot], now: OffsetDateTime, recent: Duration) -> Coverage {
    let timestamps: BTreeSet<OffsetDateTime> = snapshots.iter().map(|s| s.timestamp).collect();

    let mut per_partition: BTreeMap<u32, PartitionCoverage> = BTreeMap::new();
    for snapshot in snapshots {
        per_partition
            .entry(snapshot.netuid)
            .and_modify(|c| {
                c.data_points += 1;
                c.first = c.first.min(snapshot.timestamp);
                c.last = c.last.max(snapshot.timestamp);
            })
            .or_insert(PartitionCoverage {
                data_points: 1,
                first: snapshot.timestamp,
                last: snapshot.timestamp,
            });
    }

    let recent_timestamps = match now.checked_sub(recent) {
        Some(cutoff) => timestamps.range(cutoff..).count(),
        None => timestamps.len(),
    };

    Coverage {
        data_points: snapshots.len(),
        unique_timestamps: timestamps.len(),
        first: timestamps.first().copied(),
        last: timestamps.last().copied(),
        per_partition,
        recent_timestamps,
        suitable: recent_timestamps > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn snapshot(netuid: u32, timestamp: OffsetDateTime) -> Snapshot {
        Snapshot {
            timestamp,
            netuid,
            stake: 1.0,
            price: 1.0,
            dtao_value: 1.0,
            tao_price: 1.0,
            tao_balance: None,
        }
    }

    #[test]
    fn test_coverage_counts() {
        let snapshots = vec![
            snapshot(0, datetime!(2025-07-01 00:00 UTC)),
            snapshot(3, datetime!(2025-07-01 00:00 UTC)),
            snapshot(3, datetime!(2025-07-01 23:00 UTC)),
        ];
        let now = datetime!(2025-07-02 00:00 UTC);
        let report = coverage(&snapshots, now, Duration::hours(24));

        assert_eq!(report.data_points, 3);
        assert_eq!(report.unique_timestamps, 2);
        assert_eq!(report.first, Some(datetime!(2025-07-01 00:00 UTC)));
        assert_eq!(report.last, Some(datetime!(2025-07-01 23:00 UTC)));
        assert_eq!(report.per_partition[&3].data_points, 2);
        assert_eq!(report.recent_timestamps, 2);
        assert!(report.suitable);
    }

    #[test]
    fn test_stale_data_not_suitable() {
        let snapshots = vec![snapshot(1, datetime!(2025-06-01 00:00 UTC))];
        let report = coverage(&snapshots, datetime!(2025-07-01 00:00 UTC), Duration::hours(24));

        assert_eq!(report.recent_timestamps, 0);
        assert!(!report.suitable);
    }

    #[test]
    fn test_empty() {
        let report = coverage(&[], datetime!(2025-07-01 00:00 UTC), Duration::hours(24));
        assert_eq!(report, Coverage::default());
    }

    #[test]
    fn test_lookback_past_earliest_date_counts_all() {
        let snapshots = vec![
            snapshot(1, datetime!(2025-06-01 00:00 UTC)),
            snapshot(1, datetime!(2025-07-01 00:00 UTC)),
        ];
        let recent = Duration::hours(i64::from(u32::MAX));
        let report = coverage(&snapshots, datetime!(2025-07-02 00:00 UTC), recent);

        assert_eq!(report.recent_timestamps, 2);
        assert!(report.suitable);
    }
}
