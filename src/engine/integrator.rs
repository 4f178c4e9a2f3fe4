use crate::domain::{Decimal, LiquidityRecord, TimeSec};

/// Time-weighted liquidity over `[window_start, window_end]`.
///
/// Each snapshot carries the running integral up to its own timestamp, so the
/// window integral is the difference of two point evaluations: the `ended`
/// snapshot evaluated at `window_end` minus the `start` snapshot evaluated at
/// `window_start`. Liquidity is held flat after a snapshot when a boundary
/// falls beyond it.
///
/// The result can be negative when snapshot data is inconsistent; callers
/// clamp. `window_end < window_start` is not supported.
pub fn integrate(record: &LiquidityRecord, window_start: TimeSec, window_end: TimeSec) -> Decimal {
    let Some(ended) = record.ended.as_ref() else {
        return Decimal::zero();
    };
    if ended.timestamp < window_start {
        return Decimal::zero();
    }

    let mut value = ended.integral_at(window_end);
    if let Some(start) = record.start.as_ref() {
        value -= start.integral_at(window_start);
    }
    value
}
