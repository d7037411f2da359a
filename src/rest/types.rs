//! Request parameter types for the tao.app endpoints.
//!
//! Each type serializes to the upstream query string; `None` fields are left
//! out. The same types deserialize from the gateway's own query strings, so
//! defaults match the upstream defaults. An empty string in a gateway query
//! (`?start=`) counts as absent.

use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as, skip_serializing_none};

fn first_page() -> u32 {
    1
}

fn page_size_100() -> u32 {
    100
}

fn page_size_1000() -> u32 {
    1000
}

fn interval_1hour() -> String {
    "1hour".to_string()
}

fn interval_5min() -> String {
    "5min".to_string()
}

fn interval_15min() -> String {
    "15min".to_string()
}

fn interval_minutes_15() -> u32 {
    15
}

/// Optional date range (`YYYY-MM-DD` or timestamp strings, passed through).
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeRequest {
    /// Start of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

/// Optional subnet filter.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetuidFilter {
    /// Subnet ID to filter results.
    pub netuid: Option<u32>,
}

/// Parameters for a request scoped to one subnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetuidRequest {
    /// Subnet ID.
    pub netuid: u32,
}

/// Parameters for the estimated root APY.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootApyRequest {
    /// Aggregation interval.
    #[serde(default = "interval_1hour")]
    pub interval: String,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_100")]
    pub page_size: u32,
    /// Start of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

impl Default for RootApyRequest {
    fn default() -> Self {
        Self {
            interval: interval_1hour(),
            page: first_page(),
            page_size: page_size_100(),
            start: None,
            end: None,
        }
    }
}

/// Paged, date-bounded parameters for a single subnet.
///
/// Used by the alpha APY and subnet valuation endpoints.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetPageRequest {
    /// Subnet ID (taken from the route path by the gateway).
    #[serde(default)]
    pub netuid: u32,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_100")]
    pub page_size: u32,
    /// Start of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

impl SubnetPageRequest {
    /// First page of 100 items for a subnet.
    pub fn new(netuid: u32) -> Self {
        Self {
            netuid,
            page: first_page(),
            page_size: page_size_100(),
            start: None,
            end: None,
        }
    }
}

/// Parameters for subnet transactions.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetTransactionsRequest {
    /// Subnet ID (taken from the route path by the gateway).
    #[serde(default)]
    pub netuid: u32,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_100")]
    pub page_size: u32,
    /// Coldkey to filter results.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub coldkey: Option<String>,
    /// Start of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

impl SubnetTransactionsRequest {
    /// First page of 100 transactions for a subnet.
    pub fn new(netuid: u32) -> Self {
        Self {
            netuid,
            page: first_page(),
            page_size: page_size_100(),
            coldkey: None,
            start: None,
            end: None,
        }
    }

    /// Only transactions of this coldkey.
    pub fn coldkey(mut self, coldkey: impl Into<String>) -> Self {
        self.coldkey = Some(coldkey.into());
        self
    }
}

/// Parameters for subnet OHLC candles. Both bounds are required upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetOhlcRequest {
    /// Subnet ID (taken from the route path by the gateway).
    #[serde(default)]
    pub netuid: u32,
    /// Start of the data range.
    pub start: String,
    /// End of the data range.
    pub end: String,
    /// Candle width in minutes.
    #[serde(default = "interval_minutes_15")]
    pub interval_minutes: u32,
}

impl SubnetOhlcRequest {
    /// 15-minute candles for a subnet between two bounds.
    pub fn new(netuid: u32, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            netuid,
            start: start.into(),
            end: end.into(),
            interval_minutes: interval_minutes_15(),
        }
    }
}

/// Parameters for a subnet metagraph.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetagraphRequest {
    /// UTC timestamp of a historical metagraph; latest when absent.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Parameters identifying a portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColdkeyRequest {
    /// Coldkey of the user.
    pub coldkey: String,
}

impl ColdkeyRequest {
    /// Request for the given coldkey.
    pub fn new(coldkey: impl Into<String>) -> Self {
        Self {
            coldkey: coldkey.into(),
        }
    }
}

/// Parameters for portfolio balance history.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceHistoryRequest {
    /// Coldkey of the user.
    pub coldkey: String,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_1000")]
    pub page_size: u32,
    /// Start date (`YYYY-MM-DD`).
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End date (`YYYY-MM-DD`).
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

impl BalanceHistoryRequest {
    /// First page of 1000 entries for a coldkey.
    pub fn new(coldkey: impl Into<String>) -> Self {
        Self {
            coldkey: coldkey.into(),
            page: first_page(),
            page_size: page_size_1000(),
            start: None,
            end: None,
        }
    }
}

/// Parameters for portfolio events.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioEventsRequest {
    /// Coldkey of the user.
    pub coldkey: String,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_1000")]
    pub page_size: u32,
    /// First block.
    pub start_block: Option<u64>,
    /// Last block.
    pub end_block: Option<u64>,
}

impl PortfolioEventsRequest {
    /// First page of 1000 events for a coldkey.
    pub fn new(coldkey: impl Into<String>) -> Self {
        Self {
            coldkey: coldkey.into(),
            page: first_page(),
            page_size: page_size_1000(),
            start_block: None,
            end_block: None,
        }
    }
}

/// Parameters for aggregated macro analytics.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroAnalyticsRequest {
    /// Aggregation interval.
    #[serde(default = "interval_5min")]
    pub interval: String,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_100")]
    pub page_size: u32,
    /// Start of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

impl Default for MacroAnalyticsRequest {
    fn default() -> Self {
        Self {
            interval: interval_5min(),
            page: first_page(),
            page_size: page_size_100(),
            start: None,
            end: None,
        }
    }
}

/// Parameters for aggregated subnet analytics.
#[skip_serializing_none]
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetAnalyticsRequest {
    /// Aggregation interval.
    #[serde(default = "interval_15min")]
    pub interval: String,
    /// Page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "page_size_100")]
    pub page_size: u32,
    /// Subnet ID to filter results.
    pub netuid: Option<u32>,
    /// Start of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<String>,
    /// End of the data range.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<String>,
}

impl Default for SubnetAnalyticsRequest {
    fn default() -> Self {
        Self {
            interval: interval_15min(),
            page: first_page(),
            page_size: page_size_100(),
            netuid: None,
            start: None,
            end: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_optionals_are_not_serialized() {
        let query = serde_urlencoded::to_string(RootApyRequest::default()).unwrap();
        assert_eq!(query, "interval=1hour&page=1&page_size=100");
    }

    #[test]
    fn test_present_optionals_are_serialized() {
        let request = SubnetTransactionsRequest::new(7).coldkey("5Habc");
        let query = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(query, "netuid=7&page=1&page_size=100&coldkey=5Habc");
    }

    #[test]
    fn test_gateway_query_defaults() {
        let request: BalanceHistoryRequest =
            serde_urlencoded::from_str("coldkey=5Habc&start=2025-01-01").unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1000);
        assert_eq!(request.start.as_deref(), Some("2025-01-01"));
        assert_eq!(request.end, None);

        let request: SubnetAnalyticsRequest = serde_urlencoded::from_str("netuid=3").unwrap();
        assert_eq!(request.interval, "15min");
        assert_eq!(request.netuid, Some(3));
    }

    #[test]
    fn test_empty_query_values_are_dropped() {
        let request: BalanceHistoryRequest =
            serde_urlencoded::from_str("coldkey=5Habc&start=&end=2025-02-01").unwrap();
        assert_eq!(request.start, None);
        assert_eq!(request.end.as_deref(), Some("2025-02-01"));

        let query = serde_urlencoded::to_string(&request).unwrap();
        assert_eq!(query, "coldkey=5Habc&page=1&page_size=1000&end=2025-02-01");

        let request: MetagraphRequest = serde_urlencoded::from_str("timestamp=").unwrap();
        assert_eq!(request, MetagraphRequest::default());
    }

    #[test]
    fn test_ohlc_requires_bounds() {
        let missing: Result<SubnetOhlcRequest, _> = serde_urlencoded::from_str("start=a");
        assert!(missing.is_err());

        let request: SubnetOhlcRequest = serde_urlencoded::from_str("start=a&end=b").unwrap();
        assert_eq!(request.interval_minutes, 15);
    }
}
