//! Client configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_MAX_WORKERS, DEFAULT_RETRY_BASE_DELAY_MS,
    DEFAULT_RETRY_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS,
};
use crate::errors::{Result, VendorLinkError};

/// Configuration surface exposed to the rest of the application
///
/// Read-only once a client has been built from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub max_workers: usize,
    pub retry: RetryConfig,
}

/// Backoff schedule applied to 429, 5xx and network-class failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub base_delay_ms: u64,
    /// Total attempts, including the first one.
    pub max_attempts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_workers: DEFAULT_MAX_WORKERS,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS, max_attempts: DEFAULT_RETRY_MAX_ATTEMPTS }
    }
}

impl ClientConfig {
    /// Convenience constructor for a base URL and bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), token: Some(token.into()), ..Self::default() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject values that would make the client unusable.
    ///
    /// # Errors
    /// Returns `VendorLinkError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(VendorLinkError::Config("base_url must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(VendorLinkError::Config("timeout_secs must be greater than 0".into()));
        }
        if self.max_workers == 0 {
            return Err(VendorLinkError::Config("max_workers must be greater than 0".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(VendorLinkError::Config("retry.max_attempts must be greater than 0".into()));
        }
        Ok(())
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}
