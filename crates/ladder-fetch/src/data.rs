//! Immutable types for fetch configuration and responses.

use std::time::Duration;

use bytes::Bytes;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body:   Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Bounded retry configuration.
///
/// # Examples
///
/// ```
/// use ladder_fetch::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default()
///     .max_attempts(3)
///     .backoff(Duration::from_millis(200));
/// assert_eq!(policy.max_attempts, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero behaves as one.
    ///
    /// Default: 5
    pub max_attempts: u32,

    /// Base delay; attempt `n` (0-indexed) waits `backoff * (n + 1)`.
    ///
    /// Default: 800ms
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff:      Duration::from_millis(800),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub timeout:    Duration,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout:    Duration::from_secs(10),
            user_agent: concat!("ladder/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
