//! Mock data source for testing without network calls.

use super::{DataSource, DataSourceError, RawUser};
use crate::domain::TimeSec;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock data source that returns predefined records.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    users: Vec<RawUser>,
    indexed_timestamp: Option<TimeSec>,
    failure: Option<DataSourceError>,
    fetches: Arc<AtomicUsize>,
}

impl MockDataSource {
    /// Create a new mock data source with empty data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw user record.
    pub fn with_user(mut self, user: RawUser) -> Self {
        self.users.push(user);
        self
    }

    /// Add multiple raw user records.
    pub fn with_users(mut self, users: Vec<RawUser>) -> Self {
        self.users.extend(users);
        self
    }

    /// Set the indexed block timestamp reported by the source.
    pub fn with_indexed_timestamp(mut self, at: TimeSec) -> Self {
        self.indexed_timestamp = Some(at);
        self
    }

    /// Make every fetch fail with `err`.
    pub fn failing_with(mut self, err: DataSourceError) -> Self {
        self.failure = Some(err);
        self
    }

    /// Number of `fetch_users` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch_users(
        &self,
        _window_start: TimeSec,
        _window_end: TimeSec,
    ) -> Result<Vec<RawUser>, DataSourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.users.clone())
    }

    async fn fetch_indexed_timestamp(&self) -> Result<Option<TimeSec>, DataSourceError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(self.indexed_timestamp)
    }
}
