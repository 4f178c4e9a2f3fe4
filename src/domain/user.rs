//! Per-user trading aggregate for one evaluation window.

use crate::domain::{Account, Decimal, LiquidityRecord, TimeSec};
use serde::{Deserialize, Serialize};

/// Cumulative-to-date trading totals at a snapshot boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSnapshot {
    pub trading_volume: Decimal,
    pub condition_trade_volume: Decimal,
    pub swap: Decimal,
    pub net_profit: Decimal,
}

/// A user's trading totals plus the boundary snapshots around the window.
///
/// Top-level totals are the latest observed values as of
/// `latest_update_timestamp`, which may be later than the window end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub account: Account,
    pub trading_volume: Decimal,
    pub condition_trade_volume: Decimal,
    pub swap: Decimal,
    pub net_profit: Decimal,
    pub latest_update_timestamp: TimeSec,
    pub start: Option<TradingSnapshot>,
    pub ended: Option<TradingSnapshot>,
    pub liquidity: LiquidityRecord,
}

impl UserRecord {
    /// A user with zero totals, no snapshots and no liquidity.
    pub fn new(account: Account) -> Self {
        Self {
            liquidity: LiquidityRecord::empty(account.clone()),
            account,
            trading_volume: Decimal::zero(),
            condition_trade_volume: Decimal::zero(),
            swap: Decimal::zero(),
            net_profit: Decimal::zero(),
            latest_update_timestamp: TimeSec::default(),
            start: None,
            ended: None,
        }
    }

    pub fn with_totals(mut self, trading_volume: Decimal, net_profit: Decimal) -> Self {
        self.trading_volume = trading_volume;
        self.net_profit = net_profit;
        self
    }

    pub fn with_latest_update(mut self, at: TimeSec) -> Self {
        self.latest_update_timestamp = at;
        self
    }

    pub fn with_start(mut self, snapshot: TradingSnapshot) -> Self {
        self.start = Some(snapshot);
        self
    }

    pub fn with_ended(mut self, snapshot: TradingSnapshot) -> Self {
        self.ended = Some(snapshot);
        self
    }

    pub fn with_liquidity(mut self, liquidity: LiquidityRecord) -> Self {
        self.liquidity = liquidity;
        self
    }
}
