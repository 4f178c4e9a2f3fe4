//! Calculation configuration and per-user point results.

use crate::domain::{Account, Decimal};
use serde::{Deserialize, Serialize};

/// Rates and optional per-user caps for each point category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationConfig {
    pub liquidity_rate: Decimal,
    pub liquidity_limit: Option<Decimal>,
    pub trade_rate: Decimal,
    pub trade_limit: Option<Decimal>,
    pub trade_profit_rate: Decimal,
    pub trade_profit_limit: Option<Decimal>,
}

impl CalculationConfig {
    /// Uncapped configuration with the given rates.
    pub fn with_rates(liquidity_rate: Decimal, trade_rate: Decimal, trade_profit_rate: Decimal) -> Self {
        Self {
            liquidity_rate,
            liquidity_limit: None,
            trade_rate,
            trade_limit: None,
            trade_profit_rate,
            trade_profit_limit: None,
        }
    }
}

/// Points earned by one user in one window. All fields are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointResult {
    pub account: Account,
    pub liquidity_points: Decimal,
    pub trade_points: Decimal,
    pub trade_profit_points: Decimal,
}

impl PointResult {
    pub fn total(&self) -> Decimal {
        &self.liquidity_points + &self.trade_points + &self.trade_profit_points
    }

    pub fn is_zero(&self) -> bool {
        self.liquidity_points.is_zero() && self.trade_points.is_zero() && self.trade_profit_points.is_zero()
    }
}
