use std::time::Duration;
use tokio::time::Instant;

/// Minimum spacing between outbound requests.
///
/// Owned by whoever drives a fetch and handed to each request by `&mut`, so
/// concurrent fetches never share pacing state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: None,
        }
    }

    /// Wait until the next request is allowed, then record it.
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_request {
            tokio::time::sleep_until(last + self.min_interval).await;
        }
        self.last_request = Some(Instant::now());
    }
}
