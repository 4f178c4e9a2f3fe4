//! Data source abstraction for fetching per-user activity records.

use crate::domain::TimeSec;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod graphql;
pub mod mock;
pub mod rate_limit;
pub mod raw;

pub use graphql::{GraphQlDataSource, GraphQlSettings};
pub use mock::MockDataSource;
pub use rate_limit::RateLimiter;
pub use raw::{RawLiquidity, RawLiquiditySnapshot, RawTradingSnapshot, RawUser};

/// Source of raw user records for an evaluation window.
///
/// Implementations must handle pagination, retry/backoff, and rate limiting,
/// and return the complete record set before any scoring starts.
#[async_trait]
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Fetch every user record with the boundary snapshots for the window.
    ///
    /// The result is deduplicated by account (first occurrence wins).
    async fn fetch_users(
        &self,
        window_start: TimeSec,
        window_end: TimeSec,
    ) -> Result<Vec<RawUser>, DataSourceError>;

    /// Timestamp of the latest block the source has indexed, if it reports one.
    async fn fetch_indexed_timestamp(&self) -> Result<Option<TimeSec>, DataSourceError>;
}

/// Error type for data source operations.
#[derive(Debug, Clone, Error)]
pub enum DataSourceError {
    /// Network error (e.g., connection timeout, DNS failure)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error (e.g., 429 rate limit, 5xx server error)
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },
    /// The endpoint answered with a GraphQL `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),
    /// Parsing error (invalid JSON or malformed response)
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Rate limit exceeded
    #[error("Rate limited")]
    RateLimited,
    /// Transient failures persisted through every allowed attempt
    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<DataSourceError>,
    },
}
