//! Conversion of validated wire records into domain records.

use crate::datasource::raw::scalar_text;
use crate::datasource::{RawLiquidity, RawLiquiditySnapshot, RawTradingSnapshot, RawUser};
use crate::domain::{
    Account, Decimal, LiquidityRecord, LiquiditySnapshot, TimeSec, TradingSnapshot, UserRecord,
};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("record has no account")]
    MissingAccount,
    #[error("{account}: invalid {field}: {message}")]
    InvalidField {
        account: String,
        field: String,
        message: String,
    },
}

/// Build a domain record from a raw one.
///
/// Missing numeric fields become zero, missing liquidity becomes the empty
/// record, and only the first element of each snapshot list is used.
pub fn to_user_record(raw: &RawUser) -> Result<UserRecord, TransformError> {
    let account = raw
        .account
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(TransformError::MissingAccount)?;
    let ctx = FieldContext { account };
    let account = Account::new(account);

    let liquidity = match &raw.liquidity {
        Some(liquidity) => liquidity_record(&ctx, account.clone(), liquidity)?,
        None => LiquidityRecord::empty(account.clone()),
    };

    Ok(UserRecord {
        trading_volume: ctx.decimal("tradingVolume", raw.trading_volume.as_ref())?,
        condition_trade_volume: ctx.decimal("conditionTradeVolume", raw.condition_trade_volume.as_ref())?,
        swap: ctx.decimal("swap", raw.swap.as_ref())?,
        net_profit: ctx.decimal("netProfit", raw.net_profit.as_ref())?,
        latest_update_timestamp: ctx.timestamp("latestUpdateTimestamp", raw.latest_update_timestamp.as_ref())?,
        start: raw.start.first().map(|s| trading_snapshot(&ctx, "start", s)).transpose()?,
        ended: raw.ended.first().map(|s| trading_snapshot(&ctx, "ended", s)).transpose()?,
        liquidity,
        account,
    })
}

pub fn to_user_records(raws: &[RawUser]) -> Result<Vec<UserRecord>, TransformError> {
    raws.iter().map(to_user_record).collect()
}

struct FieldContext<'a> {
    account: &'a str,
}

impl FieldContext<'_> {
    fn error(&self, field: &str, message: impl Into<String>) -> TransformError {
        TransformError::InvalidField {
            account: self.account.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn decimal(&self, field: &str, value: Option<&Value>) -> Result<Decimal, TransformError> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(Decimal::zero());
        };
        let text = scalar_text(value).ok_or_else(|| self.error(field, "not a scalar"))?;
        Decimal::from_str_canonical(&text).map_err(|e| self.error(field, e.to_string()))
    }

    fn timestamp(&self, field: &str, value: Option<&Value>) -> Result<TimeSec, TransformError> {
        let Some(value) = value.filter(|v| !v.is_null()) else {
            return Ok(TimeSec::default());
        };
        let text = scalar_text(value).ok_or_else(|| self.error(field, "not a scalar"))?;
        text.parse::<i64>()
            .map(TimeSec::new)
            .map_err(|e| self.error(field, e.to_string()))
    }
}

fn trading_snapshot(
    ctx: &FieldContext<'_>,
    prefix: &str,
    raw: &RawTradingSnapshot,
) -> Result<TradingSnapshot, TransformError> {
    Ok(TradingSnapshot {
        trading_volume: ctx.decimal(&format!("{}.tradingVolume", prefix), raw.trading_volume.as_ref())?,
        condition_trade_volume: ctx.decimal(
            &format!("{}.conditionTradeVolume", prefix),
            raw.condition_trade_volume.as_ref(),
        )?,
        swap: ctx.decimal(&format!("{}.swap", prefix), raw.swap.as_ref())?,
        net_profit: ctx.decimal(&format!("{}.netProfit", prefix), raw.net_profit.as_ref())?,
    })
}

fn liquidity_record(
    ctx: &FieldContext<'_>,
    account: Account,
    raw: &RawLiquidity,
) -> Result<LiquidityRecord, TransformError> {
    Ok(LiquidityRecord {
        account,
        lp: ctx.decimal("liquidity.lp", raw.lp.as_ref())?,
        start: raw
            .start
            .first()
            .map(|s| liquidity_snapshot(ctx, "liquidity.start", s))
            .transpose()?,
        ended: raw
            .ended
            .first()
            .map(|s| liquidity_snapshot(ctx, "liquidity.ended", s))
            .transpose()?,
    })
}

fn liquidity_snapshot(
    ctx: &FieldContext<'_>,
    prefix: &str,
    raw: &RawLiquiditySnapshot,
) -> Result<LiquiditySnapshot, TransformError> {
    Ok(LiquiditySnapshot {
        id: raw.id.clone().unwrap_or_default(),
        lp: ctx.decimal(&format!("{}.lp", prefix), raw.lp.as_ref())?,
        base_points: ctx.decimal(&format!("{}.basePoints", prefix), raw.base_points.as_ref())?,
        timestamp: ctx.timestamp(&format!("{}.timestamp", prefix), raw.timestamp.as_ref())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_full_record() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": "0xabc",
            "tradingVolume": "1000",
            "conditionTradeVolume": "10",
            "swap": "3",
            "netProfit": "-20.5",
            "latestUpdateTimestamp": "1700000500",
            "start": [{ "tradingVolume": "100", "netProfit": "1" }],
            "ended": [{ "tradingVolume": "900", "netProfit": "2" }],
            "liquidity": {
                "lp": "50",
                "start": [{ "id": "s", "lp": "40", "basePoints": "7", "timestamp": "1699990000" }],
                "ended": [{ "id": "e", "lp": "50", "basePoints": "9", "timestamp": 1700000000 }]
            }
        }))
        .unwrap();

        let record = to_user_record(&raw).unwrap();
        assert_eq!(record.account, Account::new("0xabc"));
        assert_eq!(record.trading_volume, d("1000"));
        assert_eq!(record.net_profit, d("-20.5"));
        assert_eq!(record.latest_update_timestamp, TimeSec::new(1_700_000_500));

        let start = record.start.unwrap();
        assert_eq!(start.trading_volume, d("100"));
        assert_eq!(start.swap, Decimal::zero());
        assert_eq!(record.ended.unwrap().trading_volume, d("900"));

        let liquidity = record.liquidity;
        assert_eq!(liquidity.account, Account::new("0xabc"));
        assert_eq!(liquidity.lp, d("50"));
        assert_eq!(liquidity.start.unwrap().timestamp, TimeSec::new(1_699_990_000));
        let ended = liquidity.ended.unwrap();
        assert_eq!(ended.id, "e");
        assert_eq!(ended.base_points, d("9"));
    }

    #[test]
    fn test_large_and_long_values_survive_exactly() {
        let raw = RawUser {
            account: Some("0x1".to_string()),
            trading_volume: Some(json!("100000000000000000000000000000")),
            net_profit: Some(json!("0.123456789012345678901234567890")),
            ..RawUser::default()
        };
        let record = to_user_record(&raw).unwrap();
        assert_eq!(record.trading_volume.to_canonical_string(), "100000000000000000000000000000");
        assert_eq!(record.net_profit.to_canonical_string(), "0.12345678901234567890123456789");
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = RawUser {
            account: Some("0x1".to_string()),
            ..RawUser::default()
        };
        let record = to_user_record(&raw).unwrap();
        assert_eq!(record, UserRecord::new(Account::new("0x1")));
        assert!(!record.liquidity.has_history());
    }

    #[test]
    fn test_missing_account_is_error() {
        assert_eq!(
            to_user_record(&RawUser::default()),
            Err(TransformError::MissingAccount)
        );
    }

    #[test]
    fn test_invalid_number_is_error() {
        let raw = RawUser {
            account: Some("0x1".to_string()),
            swap: Some(json!("nope")),
            ..RawUser::default()
        };
        match to_user_record(&raw) {
            Err(TransformError::InvalidField { account, field, .. }) => {
                assert_eq!(account, "0x1");
                assert_eq!(field, "swap");
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }
}
