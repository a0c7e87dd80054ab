//! Paginated HTTP fetching with bounded retry.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and response types
//! - [`core`] - Pure transformations (backoff schedule, status classification)
//! - `effects` - I/O behind the [`HttpClient`] trait
//!
//! The retry layer reports outcomes to its caller only; it never logs.

pub mod core;
pub mod data;
mod effects;
mod error;

pub use self::core::{is_acceptable, retry_delay};
pub use data::{ClientSettings, HttpResponse, RetryPolicy};
pub use effects::{HttpClient, RetryClient};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
