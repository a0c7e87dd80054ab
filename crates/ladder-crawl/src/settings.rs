use std::path::PathBuf;
use std::time::Duration;

use ladder_fetch::{ClientSettings, RetryPolicy};
use serde::{Deserialize, Serialize};

use crate::error::{CrawlError, Result};

/// Tunables of one crawl run.
///
/// Durations are plain millisecond counts so they read naturally from TOML
/// and environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Parent of every target's storage root (`{data_root}/{target}`).
    pub data_root: PathBuf,
    /// Entries requested per page; the endpoint's documented maximum.
    pub page_size: u32,
    pub workers: usize,
    /// Maximum number of pages issued but not yet integrated.
    pub prefetch: usize,
    pub bucket_width: u64,
    pub save_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
    /// Attributes removed from every snapshot before it is stored.
    pub volatile_fields: Vec<String>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("Data"),
            page_size: 400,
            workers: 6,
            prefetch: 12,
            bucket_width: 20_000,
            save_interval_ms: 30_000,
            request_timeout_ms: 10_000,
            max_attempts: 5,
            retry_backoff_ms: 800,
            volatile_fields: vec!["history".to_string()],
        }
    }
}

impl CrawlSettings {
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(CrawlError::InvalidSettings("workers must be at least 1".into()));
        }
        if self.prefetch == 0 {
            return Err(CrawlError::InvalidSettings("prefetch must be at least 1".into()));
        }
        if self.bucket_width == 0 {
            return Err(CrawlError::InvalidSettings("bucket_width must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(CrawlError::InvalidSettings("page_size must be at least 1".into()));
        }
        if self.save_interval_ms == 0 {
            return Err(CrawlError::InvalidSettings("save_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn save_interval(&self) -> Duration { Duration::from_millis(self.save_interval_ms) }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .max_attempts(self.max_attempts)
            .backoff(Duration::from_millis(self.retry_backoff_ms))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            timeout: Duration::from_millis(self.request_timeout_ms),
            ..ClientSettings::default()
        }
    }
}
