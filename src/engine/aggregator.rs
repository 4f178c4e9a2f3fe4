use crate::domain::{CalculationConfig, Decimal, PointResult, TimeSec, TradingSnapshot, UserRecord};
use tracing::debug;

use super::integrator::integrate;

/// Computes points for every record, one result per record in input order.
///
/// Records are never merged or deduplicated by account.
pub fn aggregate(
    records: &[UserRecord],
    config: &CalculationConfig,
    window_start: TimeSec,
    window_end: TimeSec,
    overtime: bool,
) -> Vec<PointResult> {
    debug!(
        users = records.len(),
        window_start = window_start.as_secs(),
        window_end = window_end.as_secs(),
        overtime,
        "aggregating points"
    );

    records
        .iter()
        .map(|record| user_points(record, config, window_start, window_end, overtime))
        .collect()
}

/// Points for a single user.
pub fn user_points(
    record: &UserRecord,
    config: &CalculationConfig,
    window_start: TimeSec,
    window_end: TimeSec,
    overtime: bool,
) -> PointResult {
    let liquidity = integrate(&record.liquidity, window_start, window_end);
    let liquidity_points = (liquidity * &config.liquidity_rate)
        .clamp_non_negative()
        .cap(config.liquidity_limit.as_ref());

    let end_snapshot = boundary_snapshot(record, window_end, overtime);

    let volume = in_window(
        &record.trading_volume,
        end_snapshot.map(|s| &s.trading_volume),
        record.start.as_ref().map(|s| &s.trading_volume),
    );
    let trade_points = (volume * &config.trade_rate)
        .clamp_non_negative()
        .cap(config.trade_limit.as_ref());

    let profit = in_window(
        &record.net_profit,
        end_snapshot.map(|s| &s.net_profit),
        record.start.as_ref().map(|s| &s.net_profit),
    );
    // Losses earn nothing and never offset the other categories.
    let trade_profit_points = if profit.is_positive() {
        (profit * &config.trade_profit_rate)
            .clamp_non_negative()
            .cap(config.trade_profit_limit.as_ref())
    } else {
        Decimal::zero()
    };

    PointResult {
        account: record.account.clone(),
        liquidity_points,
        trade_points,
        trade_profit_points,
    }
}

/// The `ended` snapshot replaces the live totals only in overtime, and only
/// for users whose last update lands after the window closed.
fn boundary_snapshot(
    record: &UserRecord,
    window_end: TimeSec,
    overtime: bool,
) -> Option<&TradingSnapshot> {
    if overtime && record.latest_update_timestamp > window_end {
        record.ended.as_ref()
    } else {
        None
    }
}

fn in_window(
    live_total: &Decimal,
    boundary: Option<&Decimal>,
    start: Option<&Decimal>,
) -> Decimal {
    let end = boundary.unwrap_or(live_total);
    match start {
        Some(start) => end - start,
        None => end.clone(),
    }
}
