//! Snapshots grouped by partition, newest first.

use std::collections::BTreeMap;

use crate::rewards::{Snapshot, TimeRange};

/// An ordered map from partition id to that partition's snapshots.
///
/// Each series is sorted by timestamp descending. The sort is stable, so
/// snapshots sharing a timestamp keep their input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedSeries {
    series: BTreeMap<u32, Vec<Snapshot>>,
}

impl PartitionedSeries {
    /// Group and order a batch of snapshots.
    pub fn from_snapshots<'a, I>(snapshots: I) -> Self
    where
        I: IntoIterator<Item = &'a Snapshot>,
    {
        let mut series: BTreeMap<u32, Vec<Snapshot>> = BTreeMap::new();
        for snapshot in snapshots {
            series
                .entry(snapshot.netuid)
                .or_default()
                .push(snapshot.clone());
        }
        for entries in series.values_mut() {
            entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        Self { series }
    }

    /// Group the snapshots that fall inside `window`.
    pub fn within(snapshots: &[Snapshot], window: &TimeRange) -> Self {
        Self::from_snapshots(snapshots.iter().filter(|s| window.contains(s.timestamp)))
    }

    /// One partition's series, newest first.
    pub fn get(&self, partition_id: u32) -> Option<&[Snapshot]> {
        self.series.get(&partition_id).map(Vec::as_slice)
    }

    /// All partitions in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Snapshot])> {
        self.series.iter().map(|(id, entries)| (*id, entries.as_slice()))
    }

    /// Number of partitions.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether there are no partitions.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Total number of snapshots across partitions.
    pub fn data_points(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn snapshot(netuid: u32, hour: u8, stake: f64) -> Snapshot {
        Snapshot {
            timestamp: datetime!(2025-07-01 00:00 UTC) + time::Duration::hours(hour as i64),
            netuid,
            stake,
            price: 1.0,
            dtao_value: 0.0,
            tao_price: 1.0,
            tao_balance: None,
        }
    }

    #[test]
    fn test_groups_and_orders_newest_first() {
        let snapshots = vec![
            snapshot(5, 1, 1.0),
            snapshot(0, 2, 2.0),
            snapshot(5, 3, 3.0),
            snapshot(5, 2, 4.0),
        ];
        let series = PartitionedSeries::from_snapshots(&snapshots);

        assert_eq!(series.len(), 2);
        assert_eq!(series.data_points(), 4);
        let stakes: Vec<f64> = series.get(5).unwrap().iter().map(|s| s.stake).collect();
        assert_eq!(stakes, vec![3.0, 4.0, 1.0]);
        let ids: Vec<u32> = series.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![0, 5]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let snapshots = vec![snapshot(1, 4, 10.0), snapshot(1, 4, 20.0)];
        let series = PartitionedSeries::from_snapshots(&snapshots);
        let stakes: Vec<f64> = series.get(1).unwrap().iter().map(|s| s.stake).collect();
        assert_eq!(stakes, vec![10.0, 20.0]);
    }
}
