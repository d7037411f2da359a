//! Reward reconstruction over portfolio balance snapshots.
//!
//! Everything here is synchronous and pure: callers fetch snapshots (see
//! [`parse_snapshots`]) and hand them to [`compute_rewards`],
//! [`rolling_rewards`], [`balance_table`] or [`coverage`].

mod coverage;
mod pricing;
mod reconstruct;
mod series;
mod snapshot;
mod table;
mod window;

pub use coverage::{Coverage, PartitionCoverage, coverage};
pub use pricing::{PriceField, PricingPolicy, REFERENCE_PARTITION};
pub use reconstruct::{
    PartitionRewards, RewardRecord, RewardReport, RollingRewards, WindowTotals, compute_rewards,
    rolling_rewards,
};
pub use series::PartitionedSeries;
pub use snapshot::{Snapshot, parse_snapshots};
pub use table::{BalanceRow, BalanceSummary, balance_summary, balance_table};
pub use window::TimeRange;
