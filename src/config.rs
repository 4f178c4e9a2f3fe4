use crate::domain::{CalculationConfig, Decimal};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub graphql_url: String,
    pub page_size: u32,
    pub max_retries: u32,
    pub min_request_interval: Duration,
    pub request_timeout: Duration,
    pub aggregate_chunk_size: usize,
    pub calculation: CalculationConfig,
    pub excluded_accounts: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Upper bound the subgraph accepts for `first`.
pub const MAX_PAGE_SIZE: u32 = 1000;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or(&env_map, "PORT", "8080", "must be a valid u16")?;

        let graphql_url = env_map
            .get("GRAPHQL_URL")
            .cloned()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("GRAPHQL_URL".to_string()))?;

        let page_size: u32 = parse_or(&env_map, "PAGE_SIZE", "1000", "must be a valid u32")?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue(
                "PAGE_SIZE".to_string(),
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }

        let max_retries: u32 = parse_or(&env_map, "MAX_RETRIES", "5", "must be a valid u32")?;
        if max_retries == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_RETRIES".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let min_request_interval_ms: u64 =
            parse_or(&env_map, "MIN_REQUEST_INTERVAL_MS", "200", "must be a valid u64")?;
        let request_timeout_secs: u64 =
            parse_or(&env_map, "REQUEST_TIMEOUT_SECS", "30", "must be a valid u64")?;

        let aggregate_chunk_size: usize =
            parse_or(&env_map, "AGGREGATE_CHUNK_SIZE", "5000", "must be a valid usize")?;
        if aggregate_chunk_size == 0 {
            return Err(ConfigError::InvalidValue(
                "AGGREGATE_CHUNK_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let calculation = CalculationConfig {
            liquidity_rate: required_decimal(&env_map, "LIQUIDITY_RATE")?,
            liquidity_limit: optional_decimal(&env_map, "LIQUIDITY_LIMIT")?,
            trade_rate: required_decimal(&env_map, "TRADE_RATE")?,
            trade_limit: optional_decimal(&env_map, "TRADE_LIMIT")?,
            trade_profit_rate: required_decimal(&env_map, "TRADE_PROFIT_RATE")?,
            trade_profit_limit: optional_decimal(&env_map, "TRADE_PROFIT_LIMIT")?,
        };

        let excluded_accounts = env_map
            .get("EXCLUDED_ACCOUNTS")
            .map(|s| {
                s.split(',')
                    .map(|a| a.trim().to_string())
                    .filter(|a| !a.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            port,
            graphql_url,
            page_size,
            max_retries,
            min_request_interval: Duration::from_millis(min_request_interval_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
            aggregate_chunk_size,
            calculation,
            excluded_accounts,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
    expectation: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.as_str())
        .unwrap_or(default)
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), expectation.to_string()))
}

fn optional_decimal(
    env_map: &HashMap<String, String>,
    key: &str,
) -> Result<Option<Decimal>, ConfigError> {
    let Some(raw) = env_map.get(key).filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    let value = Decimal::from_str_canonical(raw).map_err(|_| {
        ConfigError::InvalidValue(key.to_string(), "must be a decimal number".to_string())
    })?;
    if value.is_negative() {
        return Err(ConfigError::InvalidValue(
            key.to_string(),
            "must not be negative".to_string(),
        ));
    }
    Ok(Some(value))
}

fn required_decimal(env_map: &HashMap<String, String>, key: &str) -> Result<Decimal, ConfigError> {
    optional_decimal(env_map, key)?.ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}
