//! Liquidity-provision snapshots and the per-user liquidity record.

use crate::domain::{Account, Decimal, TimeSec};
use serde::{Deserialize, Serialize};

/// Point-in-time liquidity observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquiditySnapshot {
    pub id: String,
    /// Liquidity held from `timestamp` onwards.
    pub lp: Decimal,
    /// Running integral of liquidity over time up to `timestamp`.
    pub base_points: Decimal,
    pub timestamp: TimeSec,
}

impl LiquiditySnapshot {
    pub fn new(id: impl Into<String>, lp: Decimal, base_points: Decimal, timestamp: TimeSec) -> Self {
        Self {
            id: id.into(),
            lp,
            base_points,
            timestamp,
        }
    }

    /// Running integral evaluated at `at`, holding `lp` flat after the snapshot.
    ///
    /// Times at or before the snapshot return `base_points` unchanged.
    pub fn integral_at(&self, at: TimeSec) -> Decimal {
        if self.timestamp < at {
            &self.base_points + &(Decimal::from_i64(at.seconds_since(self.timestamp)) * &self.lp)
        } else {
            self.base_points.clone()
        }
    }
}

/// Per-user liquidity aggregate for one evaluation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRecord {
    pub account: Account,
    /// Current liquidity amount.
    pub lp: Decimal,
    /// Nearest snapshot at or before the window start.
    pub start: Option<LiquiditySnapshot>,
    /// Nearest snapshot at or before the window end.
    pub ended: Option<LiquiditySnapshot>,
}

impl LiquidityRecord {
    /// Record for a user with no liquidity history.
    pub fn empty(account: Account) -> Self {
        Self {
            account,
            lp: Decimal::zero(),
            start: None,
            ended: None,
        }
    }

    pub fn has_history(&self) -> bool {
        self.ended.is_some()
    }
}
