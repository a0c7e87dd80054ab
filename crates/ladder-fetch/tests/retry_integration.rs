//! Retry behavior of `RetryClient` against scripted HTTP clients.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use ladder_fetch::{FetchError, HttpClient, HttpResponse, RetryClient, RetryPolicy};

#[derive(Debug)]
struct TestError(String);

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl std::error::Error for TestError {}

/// Replays a fixed script of outcomes, repeating the last one forever.
#[derive(Debug)]
struct ScriptedClient {
    script: Mutex<VecDeque<Result<u16, String>>>,
    calls:  AtomicU32,
}

impl ScriptedClient {
    fn new(script: Vec<Result<u16, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls:  AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 { self.calls.load(Ordering::SeqCst) }
}

impl HttpClient for ScriptedClient {
    type Error = TestError;

    async fn get(&self, _url: &str) -> Result<HttpResponse, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().cloned().unwrap()
            }
        };
        match next {
            Ok(status) => Ok(HttpResponse::new(status, format!("{{\"status\":{status}}}"))),
            Err(msg) => Err(TestError(msg)),
        }
    }
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::default()
        .max_attempts(max_attempts)
        .backoff(Duration::ZERO)
}

#[tokio::test]
async fn test_two_server_errors_then_success() {
    let client = RetryClient::new(ScriptedClient::new(vec![Ok(500), Ok(500), Ok(200)]), fast_policy(3));

    let response = client.fetch("http://test/page").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(&response.body[..], b"{\"status\":200}");
    assert_eq!(client.inner().calls(), 3);
}

#[tokio::test]
async fn test_rate_limited_exhausts_attempts() {
    let client = RetryClient::new(ScriptedClient::new(vec![Ok(429)]), fast_policy(4));

    let err = client.fetch("http://test/page").await.unwrap_err();

    assert!(matches!(err, FetchError::Exhausted { attempts: 4, .. }));
    assert!(matches!(err.last_failure(), FetchError::Status(429)));
    assert_eq!(client.inner().calls(), 4);
}

#[tokio::test]
async fn test_transport_errors_are_retried() {
    let client = RetryClient::new(
        ScriptedClient::new(vec![Err("connection reset".to_string()), Ok(200)]),
        fast_policy(5),
    );

    let response = client.fetch("http://test/page").await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(client.inner().calls(), 2);
}

#[tokio::test]
async fn test_last_transport_failure_is_reported() {
    let client = RetryClient::new(ScriptedClient::new(vec![Ok(503), Err("timed out".to_string())]), fast_policy(2));

    let err = client.fetch("http://test/page").await.unwrap_err();

    match err.last_failure() {
        FetchError::Transport(msg) => assert_eq!(msg, "timed out"),
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_error_is_accepted_without_retry() {
    let client = RetryClient::new(ScriptedClient::new(vec![Ok(404)]), fast_policy(5));

    let response = client.fetch("http://test/page").await.unwrap();

    assert_eq!(response.status, 404);
    assert_eq!(client.inner().calls(), 1);
}

#[tokio::test]
async fn test_zero_attempts_still_tries_once() {
    let client = RetryClient::new(ScriptedClient::new(vec![Ok(500)]), fast_policy(0));

    let err = client.fetch("http://test/page").await.unwrap_err();

    assert!(matches!(err, FetchError::Exhausted { attempts: 1, .. }));
    assert_eq!(client.inner().calls(), 1);
}

#[tokio::test]
async fn test_backoff_is_applied_between_attempts() {
    let client = RetryClient::new(
        ScriptedClient::new(vec![Ok(500), Ok(500), Ok(200)]),
        RetryPolicy::default()
            .max_attempts(3)
            .backoff(Duration::from_millis(20)),
    );

    let started = std::time::Instant::now();
    client.fetch("http://test/page").await.unwrap();

    // 20ms after the first failure, 40ms after the second.
    assert!(started.elapsed() >= Duration::from_millis(60));
}
