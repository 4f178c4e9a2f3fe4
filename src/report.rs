//! Result export: canonical CSV and the audit digest over it.

use crate::domain::{PointResult, TimeSec};
use crate::transform::{PointTotals, RecordStats, Rejected};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const CSV_HEADER: [&str; 4] = ["account", "liquidityPoints", "tradePoints", "tradeProfitPoints"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything produced by one calculation pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsReport {
    pub window_start: TimeSec,
    pub window_end: TimeSec,
    pub window_start_iso: String,
    pub window_end_iso: String,
    pub overtime: bool,
    pub digest: String,
    pub stats: RecordStats,
    pub totals: PointTotals,
    pub rejected: Vec<Rejected>,
    pub results: Vec<PointResult>,
}

impl PointsReport {
    pub fn build(
        window_start: TimeSec,
        window_end: TimeSec,
        overtime: bool,
        stats: RecordStats,
        rejected: Vec<Rejected>,
        results: Vec<PointResult>,
    ) -> Result<Self, ReportError> {
        let digest = digest(window_start, window_end, overtime, &results)?;
        Ok(Self {
            window_start,
            window_end,
            window_start_iso: window_start.to_rfc3339(),
            window_end_iso: window_end.to_rfc3339(),
            overtime,
            digest,
            stats,
            totals: PointTotals::from_results(&results),
            rejected,
            results,
        })
    }
}

/// Results as CSV with canonical decimal strings, in result order.
pub fn to_csv(results: &[PointResult]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for result in results {
        let liquidity = result.liquidity_points.to_canonical_string();
        let trade = result.trade_points.to_canonical_string();
        let profit = result.trade_profit_points.to_canonical_string();
        writer.write_record([
            result.account.as_str(),
            liquidity.as_str(),
            trade.as_str(),
            profit.as_str(),
        ])?;
    }
    writer.into_inner().map_err(|e| ReportError::Io(e.into_error()))
}

/// SHA-256 (hex) over the window parameters and the canonical CSV.
///
/// Identical inputs always yield the same digest, so published totals can be
/// re-derived and checked.
pub fn digest(
    window_start: TimeSec,
    window_end: TimeSec,
    overtime: bool,
    results: &[PointResult],
) -> Result<String, ReportError> {
    let mut hasher = Sha256::new();
    hasher.update(format!("window:{}-{};overtime:{}\n", window_start, window_end, overtime));
    hasher.update(to_csv(results)?);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, Decimal};

    fn result(account: &str, trade: &str) -> PointResult {
        PointResult {
            account: Account::new(account),
            liquidity_points: Decimal::zero(),
            trade_points: Decimal::from_str_canonical(trade).unwrap(),
            trade_profit_points: Decimal::zero(),
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv(&[result("0x1", "10.50"), result("0x2", "3")]).unwrap();
        let text = String::from_utf8(csv).unwrap();
        assert_eq!(
            text,
            "account,liquidityPoints,tradePoints,tradeProfitPoints\n0x1,0,10.5,0\n0x2,0,3,0\n"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let results = vec![result("0x1", "1"), result("0x2", "2")];
        let a = digest(TimeSec::new(1), TimeSec::new(2), false, &results).unwrap();
        let b = digest(TimeSec::new(1), TimeSec::new(2), false, &results.clone()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_digest_changes_with_inputs() {
        let results = vec![result("0x1", "1")];
        let base = digest(TimeSec::new(1), TimeSec::new(2), false, &results).unwrap();
        assert_ne!(base, digest(TimeSec::new(1), TimeSec::new(2), true, &results).unwrap());
        assert_ne!(base, digest(TimeSec::new(1), TimeSec::new(3), false, &results).unwrap());
        assert_ne!(
            base,
            digest(TimeSec::new(1), TimeSec::new(2), false, &[result("0x1", "1.1")]).unwrap()
        );
    }

    #[test]
    fn test_report_totals_and_iso() {
        let report = PointsReport::build(
            TimeSec::new(0),
            TimeSec::new(86_400),
            false,
            RecordStats::default(),
            vec![],
            vec![result("0x1", "4"), result("0x2", "6")],
        )
        .unwrap();
        assert_eq!(report.totals.trade_points, Decimal::from_i64(10));
        assert_eq!(report.window_end_iso, "1970-01-02T00:00:00+00:00");
        assert_eq!(report.digest.len(), 64);
    }
}
