//! Portfolio balance snapshots as returned by `/portfolio/balance`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::TaoError;

/// One timestamped observation of a subnet stake and its prices.
///
/// Field names follow the upstream JSON. Every field except `tao_balance`
/// is required; a missing one fails the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Observation time.
    #[serde(with = "timestamp")]
    pub timestamp: OffsetDateTime,
    /// Subnet id (the partition key).
    pub netuid: u32,
    /// Staked amount in subnet tokens.
    pub stake: f64,
    /// Subnet token price.
    pub price: f64,
    /// Stake value in dTAO.
    pub dtao_value: f64,
    /// TAO price in USD.
    pub tao_price: f64,
    /// Free TAO balance, when reported.
    #[serde(default)]
    pub tao_balance: Option<f64>,
}

impl Snapshot {
    /// Partition id this snapshot belongs to.
    pub fn partition_id(&self) -> u32 {
        self.netuid
    }

    /// The tracked quantity (stake).
    pub fn quantity(&self) -> f64 {
        self.stake
    }

    /// Primary price field.
    pub fn unit_price(&self) -> f64 {
        self.price
    }

    /// Secondary value field.
    pub fn secondary_value(&self) -> f64 {
        self.dtao_value
    }

    /// Alternate price field.
    pub fn secondary_price(&self) -> f64 {
        self.tao_price
    }

    /// Stake valued at the subnet token price.
    pub fn balance_value(&self) -> f64 {
        self.stake * self.price
    }
}

/// Convert an upstream JSON answer into snapshots.
///
/// `null` is treated as an empty batch. Anything else that is not an array
/// of well-formed snapshots is rejected as a whole with
/// [`TaoError::Validation`].
pub fn parse_snapshots(value: &Value) -> Result<Vec<Snapshot>, TaoError> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(TaoError::Validation(format!(
                "expected an array of snapshots, got {}",
                json_kind(other)
            )));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Snapshot::deserialize(item)
                .map_err(|e| TaoError::Validation(format!("snapshot {index}: {e}")))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// RFC 3339 timestamps; values without an offset are taken as UTC.
pub(crate) mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use time::format_description::well_known::Rfc3339;
    use time::macros::format_description;
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub fn parse(raw: &str) -> Result<OffsetDateTime, String> {
        if let Ok(parsed) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(parsed);
        }
        let naive = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        );
        PrimitiveDateTime::parse(raw, naive)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
    }
}
