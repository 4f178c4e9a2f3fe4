use crate::config::Config;
use crate::datasource::{DataSource, DataSourceError};
use crate::domain::{CalculationConfig, PointResult, TimeSec, UserRecord};
use crate::engine::aggregate;
use crate::report::{PointsReport, ReportError};
use crate::transform::{
    exclude_accounts, partition_valid, to_user_records, RecordStats, TransformError,
};
use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Runs one full calculation: fetch, validate, normalize, score, report.
#[derive(Clone)]
pub struct PointsPipeline {
    datasource: Arc<dyn DataSource>,
    config: Config,
}

impl PointsPipeline {
    pub fn new(datasource: Arc<dyn DataSource>, config: Config) -> Self {
        Self { datasource, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute points for `[window_start, window_end]`.
    ///
    /// When `overtime` is `None` it is derived from the source's freshness.
    pub async fn run(
        &self,
        window_start: TimeSec,
        window_end: TimeSec,
        overtime: Option<bool>,
    ) -> Result<PointsReport, PipelineError> {
        if window_end < window_start {
            return Err(PipelineError::InvalidWindow {
                start: window_start,
                end: window_end,
            });
        }

        let raws = self.datasource.fetch_users(window_start, window_end).await?;
        let fetched = raws.len();
        let (valid, rejected) = partition_valid(raws);

        let records = to_user_records(&valid)?;
        let records = exclude_accounts(records, &self.config.excluded_accounts);
        let stats = RecordStats::from_records(&records);

        let overtime = self.resolve_overtime(overtime, window_end).await?;
        let results = aggregate_in_chunks(
            records,
            &self.config.calculation,
            window_start,
            window_end,
            overtime,
            self.config.aggregate_chunk_size,
        )
        .await?;

        info!(
            fetched,
            rejected = rejected.len(),
            scored = results.len(),
            overtime,
            "points calculated"
        );

        Ok(PointsReport::build(
            window_start,
            window_end,
            overtime,
            stats,
            rejected,
            results,
        )?)
    }

    async fn resolve_overtime(
        &self,
        requested: Option<bool>,
        window_end: TimeSec,
    ) -> Result<bool, PipelineError> {
        if let Some(overtime) = requested {
            return Ok(overtime);
        }
        let indexed = self.datasource.fetch_indexed_timestamp().await?;
        Ok(indexed.is_some_and(|at| at > window_end))
    }
}

/// Scores large record sets on the blocking pool in fixed-size chunks.
///
/// Chunks are joined in submission order, so the output order matches the
/// input order exactly.
pub async fn aggregate_in_chunks(
    records: Vec<UserRecord>,
    config: &CalculationConfig,
    window_start: TimeSec,
    window_end: TimeSec,
    overtime: bool,
    chunk_size: usize,
) -> Result<Vec<PointResult>, PipelineError> {
    let chunk_size = chunk_size.max(1);
    if records.len() <= chunk_size {
        return Ok(aggregate(&records, config, window_start, window_end, overtime));
    }

    let records = Arc::new(records);
    let tasks = (0..records.len()).step_by(chunk_size).map(|from| {
        let records = Arc::clone(&records);
        let config = config.clone();
        tokio::task::spawn_blocking(move || {
            let to = (from + chunk_size).min(records.len());
            aggregate(&records[from..to], &config, window_start, window_end, overtime)
        })
    });

    let chunks = try_join_all(tasks)
        .await
        .map_err(|e| PipelineError::Join(e.to_string()))?;
    Ok(chunks.into_iter().flatten().collect())
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("window end {end} is before window start {start}")]
    InvalidWindow { start: TimeSec, end: TimeSec },
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("aggregation task failed: {0}")]
    Join(String),
}
