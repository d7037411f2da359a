//! tao.app REST API endpoint constants.

/// Base URL for the tao.app beta API.
pub const TAO_BASE_URL: &str = "https://api.tao.app/api/beta";

/// Network-wide and market endpoints.
pub mod market {
    /// Current network snapshot.
    pub const CURRENT: &str = "/current";
    /// Subnet screener.
    pub const SUBNET_SCREENER: &str = "/subnet_screener";
    /// Fear & greed index history.
    pub const FEAR_GREED: &str = "/analytics/macro/fear_greed";
    /// Current fear & greed index.
    pub const FEAR_GREED_CURRENT: &str = "/analytics/macro/fear_greed/current";
    /// Price sustainability.
    pub const PRICE_SUSTAINABILITY: &str = "/price-sustainability";
    /// Estimated root APY.
    pub const ROOT_APY: &str = "/apy/root";
    /// Alpha APY for a subnet.
    pub const ALPHA_APY: &str = "/apy/alpha";
    /// Aggregated macro analytics.
    pub const MACRO_AGGREGATED: &str = "/analytics/macro/aggregated";
    /// Validator identities.
    pub const VALIDATOR_IDENTITIES: &str = "/validator_identities";
}

/// Subnet endpoints.
pub mod subnets {
    /// All subnets information.
    pub const INFO: &str = "/analytics/subnets/info";
    /// Subnet holders.
    pub const HOLDERS: &str = "/analytics/subnets/holders";
    /// Subnet transactions.
    pub const TRANSACTIONS: &str = "/analytics/subnets/transactions";
    /// Subnet OHLC candles.
    pub const OHLC: &str = "/subnets/ohlc";
    /// Subnet valuation.
    pub const VALUATION: &str = "/analytics/subnets/valuation";
    /// Subnet metagraph (append `/{netuid}`).
    pub const METAGRAPH: &str = "/analytics/subnets/metagraph";
    /// Subnet tags.
    pub const TAGS: &str = "/subnet_tags";
    /// Aggregated subnet analytics.
    pub const AGGREGATED: &str = "/analytics/subnets/aggregated";

    /// Path for a single subnet's info.
    pub fn info(netuid: u32) -> String {
        format!("{INFO}/{netuid}")
    }

    /// Path for a single subnet's metagraph.
    pub fn metagraph(netuid: u32) -> String {
        format!("{METAGRAPH}/{netuid}")
    }
}

/// Portfolio and accounting endpoints (keyed by coldkey).
pub mod portfolio {
    /// Current portfolio balance snapshots.
    pub const BALANCE: &str = "/portfolio/balance";
    /// Balance history.
    pub const BALANCE_HISTORY: &str = "/accounting/balance-history";
    /// Portfolio events.
    pub const EVENTS: &str = "/accounting/events";
}
