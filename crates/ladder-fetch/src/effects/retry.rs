use crate::core::{is_acceptable, retry_delay};
use crate::data::{HttpResponse, RetryPolicy};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};

/// Wraps an [`HttpClient`] with bounded retry and linear backoff.
///
/// A response is accepted when its status is below 500 and not 429.
/// Transport errors, 5xx and 429 are retried after
/// [`retry_delay`](crate::retry_delay). Rejected responses are dropped
/// before sleeping so their bodies are released.
#[derive(Debug)]
pub struct RetryClient<C: HttpClient> {
    client: C,
    policy: RetryPolicy,
}

impl<C: HttpClient> RetryClient<C> {
    pub fn new(client: C, policy: RetryPolicy) -> Self { Self { client, policy } }

    pub fn inner(&self) -> &C { &self.client }

    pub async fn fetch(&self, url: &str) -> Result<HttpResponse> {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let failure = match self.client.get(url).await {
                Ok(response) if is_acceptable(response.status) => return Ok(response),
                Ok(response) => FetchError::Status(response.status),
                Err(e) => FetchError::Transport(e.to_string()),
            };

            attempt += 1;
            if attempt >= attempts {
                return Err(FetchError::Exhausted {
                    attempts,
                    last: Box::new(failure),
                });
            }

            tokio::time::sleep(retry_delay(attempt - 1, self.policy.backoff)).await;
        }
    }
}
