//! Domain primitives: TimeSec, Account.

use serde::{Deserialize, Serialize};

/// Time in whole seconds since Unix epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TimeSec(pub i64);

impl TimeSec {
    /// Create a TimeSec from seconds.
    pub fn new(secs: i64) -> Self {
        TimeSec(secs)
    }

    /// Get the underlying seconds value.
    pub fn as_secs(&self) -> i64 {
        self.0
    }

    /// Signed number of seconds from `earlier` to `self`.
    pub fn seconds_since(&self, earlier: TimeSec) -> i64 {
        self.0 - earlier.0
    }

    /// RFC 3339 rendering, or the raw number if out of chrono's range.
    pub fn to_rfc3339(&self) -> String {
        match chrono::DateTime::from_timestamp(self.0, 0) {
            Some(dt) => dt.to_rfc3339(),
            None => self.0.to_string(),
        }
    }
}

impl std::fmt::Display for TimeSec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User account identifier as reported by the data source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Account(pub String);

impl Account {
    /// Create an Account from a string.
    pub fn new(account: impl Into<String>) -> Self {
        Account(account.into())
    }

    /// Get the account as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison; hex addresses arrive in mixed case.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
