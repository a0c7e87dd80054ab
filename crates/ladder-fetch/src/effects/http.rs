use std::future::Future;

use crate::data::HttpResponse;

/// Asynchronous HTTP client abstraction.
///
/// Implementations perform exactly one request per call and hand back the
/// status together with the complete body. They never retry on their own.
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Scripted mock clients in tests
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures (DNS, connect, timeout, body read).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET request and read the whole response body.
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;
    use crate::data::ClientSettings;
    use crate::error::FetchError;

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(settings: &ClientSettings) -> Result<Self, FetchError> {
            let client = reqwest::Client::builder()
                .timeout(settings.timeout)
                .user_agent(settings.user_agent.as_str())
                .build()
                .map_err(|e| FetchError::ClientBuild(e.to_string()))?;
            Ok(Self { client })
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, url: &str) -> Result<HttpResponse, Self::Error> {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();
            // Read rejected bodies too so the connection goes back to the pool.
            let body = response.bytes().await?;
            Ok(HttpResponse { status, body })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
