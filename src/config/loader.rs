//! Dataset loader configuration

use crate::loader::LoaderOptions;
use serde::Deserialize;
use std::time::Duration;

/// Fetch, retry and cache settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Extra attempts after a failed fetch
    pub retries: u32,
    /// Base backoff, doubled per retry (capped at 30s)
    pub retry_delay_ms: u64,
    /// Seconds a loaded dataset stays fresh
    pub stale_secs: u64,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            retries: 2,
            retry_delay_ms: 1000,
            stale_secs: 300,
            timeout_secs: 30,
        }
    }
}

/// Loader settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLoader {
    pub retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub stale_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

impl LoaderConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLoader>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            retries: file.retries.unwrap_or(defaults.retries),
            retry_delay_ms: file.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
            stale_secs: file.stale_secs.unwrap_or(defaults.stale_secs),
            // A zero timeout would fail every request
            timeout_secs: file
                .timeout_secs
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn options(&self) -> LoaderOptions {
        LoaderOptions {
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            stale_after: Duration::from_secs(self.stale_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}
