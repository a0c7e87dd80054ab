//! Error types for ladder-fetch.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<FetchError> },

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl FetchError {
    /// The failure of the final attempt, unwrapping [`FetchError::Exhausted`].
    pub fn last_failure(&self) -> &FetchError {
        match self {
            FetchError::Exhausted { last, .. } => last.last_failure(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
