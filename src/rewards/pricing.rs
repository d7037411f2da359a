//! Per-partition pricing rules.
//!
//! Stake deltas are turned into currency by multiplying with a price read
//! from the snapshot. Which price field applies is a property of the
//! partition: the root network (netuid 0) is denominated in TAO itself, so its
//! stake is valued at the TAO price, while every other subnet uses its own
//! token price.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rewards::Snapshot;

/// Netuid of the root network.
pub const REFERENCE_PARTITION: u32 = 0;

/// Which snapshot price a stake delta is multiplied with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// The subnet token price (`price`).
    UnitPrice,
    /// The TAO price (`tao_price`).
    SecondaryPrice,
    /// Token price converted through the TAO price (`price * tao_price`).
    UnitInSecondary,
}

impl PriceField {
    /// Read this price from a snapshot.
    pub fn price_of(self, snapshot: &Snapshot) -> f64 {
        match self {
            PriceField::UnitPrice => snapshot.price,
            PriceField::SecondaryPrice => snapshot.tao_price,
            PriceField::UnitInSecondary => snapshot.price * snapshot.tao_price,
        }
    }
}

/// A default price field plus per-partition overrides.
///
/// # Example
///
/// ```rust
/// use tao_income_api::rewards::{PriceField, PricingPolicy};
///
/// let policy = PricingPolicy::standard();
/// assert_eq!(policy.field_for(0), PriceField::SecondaryPrice);
/// assert_eq!(policy.field_for(19), PriceField::UnitPrice);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricingPolicy {
    default: PriceField,
    overrides: BTreeMap<u32, PriceField>,
}

impl PricingPolicy {
    /// Every partition valued with the same field.
    pub fn uniform(field: PriceField) -> Self {
        Self {
            default: field,
            overrides: BTreeMap::new(),
        }
    }

    /// Subnet token price everywhere, TAO price for the root network.
    pub fn standard() -> Self {
        Self::uniform(PriceField::UnitPrice)
            .with_override(REFERENCE_PARTITION, PriceField::SecondaryPrice)
    }

    /// USD valuation: token price times TAO price, TAO price for the root network.
    pub fn usd() -> Self {
        Self::uniform(PriceField::UnitInSecondary)
            .with_override(REFERENCE_PARTITION, PriceField::SecondaryPrice)
    }

    /// Use `field` for one partition.
    pub fn with_override(mut self, partition_id: u32, field: PriceField) -> Self {
        self.overrides.insert(partition_id, field);
        self
    }

    /// The field that applies to a partition.
    pub fn field_for(&self, partition_id: u32) -> PriceField {
        self.overrides
            .get(&partition_id)
            .copied()
            .unwrap_or(self.default)
    }

    /// The price of a snapshot under this policy.
    pub fn price(&self, snapshot: &Snapshot) -> f64 {
        self.field_for(snapshot.netuid).price_of(snapshot)
    }

    /// Value a quantity at a snapshot's price under this policy.
    pub fn value(&self, quantity: f64, snapshot: &Snapshot) -> f64 {
        quantity * self.price(snapshot)
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn snapshot(netuid: u32) -> Snapshot {
        Snapshot {
            timestamp: datetime!(2025-07-01 12:00 UTC),
            netuid,
            stake: 10.0,
            price: 0.5,
            dtao_value: 5.0,
            tao_price: 300.0,
            tao_balance: None,
        }
    }

    #[test]
    fn test_standard_policy_routes_reference_partition() {
        let policy = PricingPolicy::standard();
        assert_eq!(policy.price(&snapshot(0)), 300.0);
        assert_eq!(policy.price(&snapshot(7)), 0.5);
    }

    #[test]
    fn test_usd_policy() {
        let policy = PricingPolicy::usd();
        assert_eq!(policy.value(2.0, &snapshot(7)), 300.0);
        assert_eq!(policy.value(2.0, &snapshot(0)), 600.0);
    }

    #[test]
    fn test_override_replaces_default() {
        let policy = PricingPolicy::uniform(PriceField::UnitPrice)
            .with_override(7, PriceField::SecondaryPrice);
        assert_eq!(policy.field_for(7), PriceField::SecondaryPrice);
        assert_eq!(policy.field_for(0), PriceField::UnitPrice);
    }
}
