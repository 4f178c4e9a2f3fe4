//! Summary statistics and filters over record and result sets.

use crate::domain::{Decimal, PointResult, UserRecord};
use serde::Serialize;

/// Drop records whose account appears in `excluded` (case-insensitive).
pub fn exclude_accounts(records: Vec<UserRecord>, excluded: &[String]) -> Vec<UserRecord> {
    if excluded.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| !excluded.iter().any(|e| r.account.matches(e)))
        .collect()
}

/// Shape of the input set handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub users: usize,
    pub users_with_liquidity: usize,
    pub total_trading_volume: Decimal,
    pub total_net_profit: Decimal,
}

impl RecordStats {
    pub fn from_records(records: &[UserRecord]) -> Self {
        Self {
            users: records.len(),
            users_with_liquidity: records.iter().filter(|r| r.liquidity.has_history()).count(),
            total_trading_volume: records.iter().map(|r| &r.trading_volume).sum(),
            total_net_profit: records.iter().map(|r| &r.net_profit).sum(),
        }
    }
}

/// Per-category sums over a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointTotals {
    pub liquidity_points: Decimal,
    pub trade_points: Decimal,
    pub trade_profit_points: Decimal,
    pub total_points: Decimal,
    pub users_with_points: usize,
}

impl PointTotals {
    pub fn from_results(results: &[PointResult]) -> Self {
        let mut totals = PointTotals::default();
        for result in results {
            totals.liquidity_points += &result.liquidity_points;
            totals.trade_points += &result.trade_points;
            totals.trade_profit_points += &result.trade_profit_points;
            if !result.is_zero() {
                totals.users_with_points += 1;
            }
        }
        totals.total_points = &totals.liquidity_points + &totals.trade_points + &totals.trade_profit_points;
        totals
    }
}
