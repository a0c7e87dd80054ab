//! I/O operations: the HTTP client seam and the retry loop around it.

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::RetryClient;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
