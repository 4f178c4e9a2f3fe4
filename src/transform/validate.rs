//! Shape checks on raw records before they are normalized.

use crate::datasource::raw::scalar_text;
use crate::datasource::{RawLiquiditySnapshot, RawTradingSnapshot, RawUser};
use crate::domain::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    #[error("missing account identifier")]
    MissingAccount,
    #[error("{field}: missing")]
    MissingField { field: String },
    #[error("{field}: not a decimal number ({value})")]
    InvalidNumber { field: String, value: String },
    #[error("{field}: not an integer timestamp ({value})")]
    InvalidTimestamp { field: String, value: String },
    #[error("{field}: expected at most one snapshot, got {count}")]
    TooManySnapshots { field: String, count: usize },
}

/// A raw record kept out of the calculation, with every reason found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rejected {
    pub account: Option<String>,
    pub issues: Vec<ValidationIssue>,
}

/// All problems with one raw record; empty means it is safe to normalize.
pub fn validate(raw: &RawUser) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if raw.account_key().is_none() {
        issues.push(ValidationIssue::MissingAccount);
    }

    check_decimal(&mut issues, "tradingVolume", raw.trading_volume.as_ref());
    check_decimal(&mut issues, "conditionTradeVolume", raw.condition_trade_volume.as_ref());
    check_decimal(&mut issues, "swap", raw.swap.as_ref());
    check_decimal(&mut issues, "netProfit", raw.net_profit.as_ref());
    check_timestamp(&mut issues, "latestUpdateTimestamp", raw.latest_update_timestamp.as_ref());

    check_trading_snapshots(&mut issues, "start", &raw.start);
    check_trading_snapshots(&mut issues, "ended", &raw.ended);

    if let Some(liquidity) = &raw.liquidity {
        check_decimal(&mut issues, "liquidity.lp", liquidity.lp.as_ref());
        check_liquidity_snapshots(&mut issues, "liquidity.start", &liquidity.start);
        check_liquidity_snapshots(&mut issues, "liquidity.ended", &liquidity.ended);
    }

    issues
}

/// Split raw records into those that pass validation and those that do not.
///
/// Order is preserved on both sides.
pub fn partition_valid(raws: Vec<RawUser>) -> (Vec<RawUser>, Vec<Rejected>) {
    let mut valid = Vec::with_capacity(raws.len());
    let mut rejected = Vec::new();

    for raw in raws {
        let issues = validate(&raw);
        if issues.is_empty() {
            valid.push(raw);
        } else {
            warn!(
                account = raw.account.as_deref().unwrap_or("<none>"),
                issues = issues.len(),
                first = %issues[0],
                "rejecting malformed record"
            );
            rejected.push(Rejected {
                account: raw.account,
                issues,
            });
        }
    }

    (valid, rejected)
}

fn check_trading_snapshots(issues: &mut Vec<ValidationIssue>, field: &str, snaps: &[RawTradingSnapshot]) {
    if snaps.len() > 1 {
        issues.push(ValidationIssue::TooManySnapshots {
            field: field.to_string(),
            count: snaps.len(),
        });
    }
    for snap in snaps {
        check_decimal(issues, &format!("{}.tradingVolume", field), snap.trading_volume.as_ref());
        check_decimal(
            issues,
            &format!("{}.conditionTradeVolume", field),
            snap.condition_trade_volume.as_ref(),
        );
        check_decimal(issues, &format!("{}.swap", field), snap.swap.as_ref());
        check_decimal(issues, &format!("{}.netProfit", field), snap.net_profit.as_ref());
    }
}

fn check_liquidity_snapshots(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    snaps: &[RawLiquiditySnapshot],
) {
    if snaps.len() > 1 {
        issues.push(ValidationIssue::TooManySnapshots {
            field: field.to_string(),
            count: snaps.len(),
        });
    }
    for snap in snaps {
        check_decimal(issues, &format!("{}.lp", field), snap.lp.as_ref());
        check_decimal(issues, &format!("{}.basePoints", field), snap.base_points.as_ref());
        let ts_field = format!("{}.timestamp", field);
        match snap.timestamp.as_ref() {
            None | Some(Value::Null) => issues.push(ValidationIssue::MissingField { field: ts_field }),
            Some(value) => check_timestamp(issues, &ts_field, Some(value)),
        }
    }
}

/// Absent and null values are fine; the transformer defaults them to zero.
fn check_decimal(issues: &mut Vec<ValidationIssue>, field: &str, value: Option<&Value>) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return;
    };
    let parsed = scalar_text(value).and_then(|s| Decimal::from_str_canonical(&s).ok());
    if parsed.is_none() {
        issues.push(ValidationIssue::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

fn check_timestamp(issues: &mut Vec<ValidationIssue>, field: &str, value: Option<&Value>) {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return;
    };
    let parsed = scalar_text(value).and_then(|s| s.parse::<i64>().ok());
    if parsed.is_none() {
        issues.push(ValidationIssue::InvalidTimestamp {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}
