//! Domain types for the points calculator.
//!
//! This module provides:
//! - Lossless numeric handling via Decimal wrapper
//! - Domain primitives: TimeSec, Account
//! - Liquidity and trading snapshots with their per-user records
//! - Calculation configuration and point results

pub mod decimal;
pub mod liquidity;
pub mod points;
pub mod primitives;
pub mod user;

pub use decimal::Decimal;
pub use liquidity::{LiquidityRecord, LiquiditySnapshot};
pub use points::{CalculationConfig, PointResult};
pub use primitives::{Account, TimeSec};
pub use user::{TradingSnapshot, UserRecord};
