//! Wire-format records as returned by the subgraph.
//!
//! Everything is optional and loosely typed here; the validator decides what
//! is acceptable and the transformer turns it into domain records.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawUser {
    #[serde(alias = "id")]
    pub account: Option<String>,
    pub trading_volume: Option<Value>,
    pub condition_trade_volume: Option<Value>,
    pub swap: Option<Value>,
    pub net_profit: Option<Value>,
    pub latest_update_timestamp: Option<Value>,
    #[serde(deserialize_with = "nullable_vec")]
    pub start: Vec<RawTradingSnapshot>,
    #[serde(deserialize_with = "nullable_vec")]
    pub ended: Vec<RawTradingSnapshot>,
    pub liquidity: Option<RawLiquidity>,
}

impl RawUser {
    /// Lower-cased account used for deduplication across pages.
    pub fn account_key(&self) -> Option<String> {
        self.account
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_lowercase)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTradingSnapshot {
    pub trading_volume: Option<Value>,
    pub condition_trade_volume: Option<Value>,
    pub swap: Option<Value>,
    pub net_profit: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLiquidity {
    pub id: Option<String>,
    pub lp: Option<Value>,
    #[serde(deserialize_with = "nullable_vec")]
    pub start: Vec<RawLiquiditySnapshot>,
    #[serde(deserialize_with = "nullable_vec")]
    pub ended: Vec<RawLiquiditySnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLiquiditySnapshot {
    pub id: Option<String>,
    pub lp: Option<Value>,
    pub base_points: Option<Value>,
    pub timestamp: Option<Value>,
}

/// Text form of a scalar; subgraphs send BigInt/BigDecimal as strings but
/// plain JSON numbers are tolerated.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_user_deserializes_subgraph_shape() {
        let json = serde_json::json!({
            "id": "0xABC",
            "tradingVolume": "1000.5",
            "netProfit": "-3",
            "latestUpdateTimestamp": "1700000000",
            "start": [],
            "ended": [{ "tradingVolume": "900", "netProfit": "1" }],
            "liquidity": {
                "id": "0xabc",
                "lp": "10",
                "start": null,
                "ended": [{ "id": "l-1", "lp": "10", "basePoints": "5", "timestamp": 1699999999 }]
            }
        });

        let user: RawUser = serde_json::from_value(json).unwrap();
        assert_eq!(user.account.as_deref(), Some("0xABC"));
        assert_eq!(user.account_key().as_deref(), Some("0xabc"));
        assert!(user.start.is_empty());
        assert_eq!(user.ended.len(), 1);
        assert!(user.swap.is_none());

        let liquidity = user.liquidity.unwrap();
        assert!(liquidity.start.is_empty());
        assert_eq!(liquidity.ended.len(), 1);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&serde_json::json!(" 12.5 ")).as_deref(), Some("12.5"));
        assert_eq!(scalar_text(&serde_json::json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(&serde_json::json!(true)), None);
        assert_eq!(scalar_text(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_blank_account_has_no_key() {
        let user = RawUser {
            account: Some("  ".to_string()),
            ..RawUser::default()
        };
        assert!(user.account_key().is_none());
    }
}
