//! Subgraph (GraphQL) client implementation.

use super::{DataSource, DataSourceError, RateLimiter, RawUser};
use crate::config::Config;
use crate::domain::TimeSec;
use async_trait::async_trait;
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Users ordered by id, each with the nearest trading and liquidity snapshots
/// at or before the window bounds.
pub const USERS_QUERY: &str = r#"
query Users($first: Int!, $lastId: String!, $windowStart: BigInt!, $windowEnd: BigInt!) {
  users(first: $first, where: { id_gt: $lastId }, orderBy: id, orderDirection: asc) {
    id
    tradingVolume
    conditionTradeVolume
    swap
    netProfit
    latestUpdateTimestamp
    start: snapshots(first: 1, where: { timestamp_lte: $windowStart }, orderBy: timestamp, orderDirection: desc) {
      tradingVolume
      conditionTradeVolume
      swap
      netProfit
    }
    ended: snapshots(first: 1, where: { timestamp_lte: $windowEnd }, orderBy: timestamp, orderDirection: desc) {
      tradingVolume
      conditionTradeVolume
      swap
      netProfit
    }
    liquidity {
      id
      lp
      start: snapshots(first: 1, where: { timestamp_lte: $windowStart }, orderBy: timestamp, orderDirection: desc) {
        id
        lp
        basePoints
        timestamp
      }
      ended: snapshots(first: 1, where: { timestamp_lte: $windowEnd }, orderBy: timestamp, orderDirection: desc) {
        id
        lp
        basePoints
        timestamp
      }
    }
  }
}
"#;

pub const META_QUERY: &str = "query Meta { _meta { block { timestamp } } }";

/// Client-side knobs for talking to the subgraph.
#[derive(Debug, Clone)]
pub struct GraphQlSettings {
    pub page_size: u32,
    pub max_retries: u32,
    pub min_request_interval: Duration,
    pub request_timeout: Duration,
}

impl GraphQlSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_size: config.page_size,
            max_retries: config.max_retries,
            min_request_interval: config.min_request_interval,
            request_timeout: config.request_timeout,
        }
    }
}

impl Default for GraphQlSettings {
    fn default() -> Self {
        Self {
            page_size: 1000,
            max_retries: 5,
            min_request_interval: Duration::from_millis(200),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Data source backed by a GraphQL subgraph endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlDataSource {
    client: Client,
    url: String,
    settings: GraphQlSettings,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct UsersPage {
    #[serde(default)]
    users: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
struct MetaData {
    #[serde(rename = "_meta")]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    block: MetaBlock,
}

#[derive(Debug, Deserialize)]
struct MetaBlock {
    timestamp: Option<i64>,
}

impl GraphQlDataSource {
    pub fn new(url: String, settings: GraphQlSettings) -> Result<Self, DataSourceError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| DataSourceError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            url,
            settings,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST one query, retrying transient failures with exponential backoff.
    ///
    /// Every attempt, retries included, goes through `limiter`.
    async fn post_query<T>(
        &self,
        limiter: &mut RateLimiter,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, DataSourceError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let payload = serde_json::json!({ "query": query, "variables": variables });
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: None,
            ..Default::default()
        };
        let mut attempt = 0;

        loop {
            attempt += 1;
            limiter.acquire().await;

            let err = match self.send_once(&payload).await {
                Ok(value) => return decode_response(value),
                Err(backoff::Error::Permanent(err)) => return Err(err),
                Err(backoff::Error::Transient { err, retry_after }) => {
                    if attempt >= self.settings.max_retries {
                        return Err(DataSourceError::RetriesExhausted {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }
                    match retry_after.or_else(|| backoff.next_backoff()) {
                        Some(wait) => {
                            warn!(attempt, ?wait, error = %err, "transient subgraph failure, retrying");
                            tokio::time::sleep(wait).await;
                            continue;
                        }
                        None => err,
                    }
                }
            };
            return Err(DataSourceError::RetriesExhausted {
                attempts: attempt,
                last: Box::new(err),
            });
        }
    }

    async fn send_once(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, backoff::Error<DataSourceError>> {
        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| backoff::Error::transient(DataSourceError::NetworkError(e.to_string())))?;

        let status = response.status();
        if status == 429 {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(match retry_after {
                Some(wait) => backoff::Error::retry_after(DataSourceError::RateLimited, wait),
                None => backoff::Error::transient(DataSourceError::RateLimited),
            });
        }
        if status.is_server_error() {
            return Err(backoff::Error::transient(DataSourceError::HttpError {
                status: status.as_u16(),
                message: "Server error".to_string(),
            }));
        }
        if !status.is_success() {
            return Err(backoff::Error::permanent(DataSourceError::HttpError {
                status: status.as_u16(),
                message: "Client error".to_string(),
            }));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
    }
}

#[async_trait]
impl DataSource for GraphQlDataSource {
    async fn fetch_users(
        &self,
        window_start: TimeSec,
        window_end: TimeSec,
    ) -> Result<Vec<RawUser>, DataSourceError> {
        let mut limiter = RateLimiter::new(self.settings.min_request_interval);
        let mut seen = HashSet::new();
        let mut users = Vec::new();
        let mut last_id = String::new();
        let mut pages = 0usize;

        loop {
            let variables = users_variables(self.settings.page_size, &last_id, window_start, window_end);
            let page: UsersPage = self.post_query(&mut limiter, USERS_QUERY, variables).await?;
            pages += 1;

            let page_len = page.users.len();
            let next_cursor = page.users.last().and_then(|u| u.account.clone());
            debug!(page = pages, records = page_len, cursor = %last_id, "fetched users page");

            for user in page.users {
                if let Some(key) = user.account_key() {
                    if !seen.insert(key) {
                        continue;
                    }
                }
                users.push(user);
            }

            if page_len < self.settings.page_size as usize {
                break;
            }
            match next_cursor {
                Some(cursor) if cursor > last_id => last_id = cursor,
                _ => {
                    warn!(page = pages, "cannot advance pagination cursor, stopping");
                    break;
                }
            }
        }

        info!(
            users = users.len(),
            pages,
            window_start = window_start.as_secs(),
            window_end = window_end.as_secs(),
            "fetched user records"
        );
        Ok(users)
    }

    async fn fetch_indexed_timestamp(&self) -> Result<Option<TimeSec>, DataSourceError> {
        let mut limiter = RateLimiter::new(self.settings.min_request_interval);
        let data: MetaData = self
            .post_query(&mut limiter, META_QUERY, serde_json::json!({}))
            .await?;
        Ok(data
            .meta
            .and_then(|m| m.block.timestamp)
            .map(TimeSec::new))
    }
}

fn users_variables(
    page_size: u32,
    last_id: &str,
    window_start: TimeSec,
    window_end: TimeSec,
) -> serde_json::Value {
    serde_json::json!({
        "first": page_size,
        "lastId": last_id,
        "windowStart": window_start.as_secs().to_string(),
        "windowEnd": window_end.as_secs().to_string(),
    })
}

fn decode_response<T>(value: serde_json::Value) -> Result<T, DataSourceError>
where
    T: for<'de> Deserialize<'de>,
{
    let response: GraphQlResponse<T> =
        serde_json::from_value(value).map_err(|e| DataSourceError::ParseError(e.to_string()))?;

    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(DataSourceError::GraphQl(messages.join("; ")));
    }

    response
        .data
        .ok_or_else(|| DataSourceError::ParseError("Missing data field".to_string()))
}
