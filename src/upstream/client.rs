//! Resilient HTTP client for one upstream service.

use std::num::NonZeroU32;

use reqwest::Method;
use serde_json::{json, Value};
use url::Url;

use crate::resilience::{BackoffPolicy, CircuitBreaker};
use crate::upstream::outcome::{FailureKind, RequestOutcome};

/// Upstream HTTP statuses worth retrying: the gateway-flavored 5xx family
/// that usually signals a transient condition.
const RETRYABLE_STATUSES: [u16; 3] = [502, 503, 504];

/// Header used to correlate a forwarded call with the inbound request.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for one upstream service, wrapping every call with circuit-breaker
/// admission control and bounded retry.
///
/// One instance per upstream is built at startup and lives for the process
/// lifetime; the breaker inside it is the only shared mutable state.
#[derive(Debug)]
pub struct UpstreamClient {
    name: String,
    base_url: Url,
    http: reqwest::Client,
    breaker: CircuitBreaker,
    backoff: BackoffPolicy,
    max_attempts: NonZeroU32,
}

/// What the last attempt in the retry loop left behind.
enum LastFailure {
    Http { status: u16, body: Value },
    Transport { reason: String },
}

impl UpstreamClient {
    pub fn new(
        name: impl Into<String>,
        base_url: Url,
        http: reqwest::Client,
        breaker: CircuitBreaker,
        backoff: BackoffPolicy,
        max_attempts: NonZeroU32,
    ) -> Self {
        Self {
            name: name.into(),
            base_url,
            http,
            breaker,
            backoff,
            max_attempts,
        }
    }

    /// The circuit breaker guarding this upstream.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute one logical call against this upstream.
    ///
    /// Admission is checked once, before any network activity; retries run
    /// beneath an already-admitted call. The returned outcome is terminal —
    /// intermediate attempt failures are never surfaced.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(String, String)]>,
        body: Option<&Value>,
        request_id: Option<&str>,
    ) -> RequestOutcome {
        if !self.breaker.allow_request() {
            tracing::warn!(upstream = %self.name, path, "circuit open, fast-failing request");
            return RequestOutcome::Failure {
                kind: FailureKind::CircuitOpen,
                status: 503,
                body: error_body(
                    FailureKind::CircuitOpen,
                    format!("{} service circuit breaker is open", self.name),
                ),
            };
        }

        let max_attempts = self.max_attempts.get();
        let mut last_failure = None;

        for attempt in 0..max_attempts {
            match self.attempt(&method, path, query, body, request_id).await {
                Ok((status, payload)) => {
                    if status < 400 {
                        self.breaker.record_success();
                        return RequestOutcome::Success(payload);
                    }
                    if status >= 500 {
                        self.breaker.record_failure();
                    }
                    if !RETRYABLE_STATUSES.contains(&status) {
                        // Non-retryable error: surface the upstream response
                        // verbatim, no matter how many attempts remain.
                        return RequestOutcome::Failure {
                            kind: FailureKind::from_status(status),
                            status,
                            body: payload,
                        };
                    }

                    last_failure = Some(LastFailure::Http {
                        status,
                        body: payload,
                    });
                    if attempt + 1 < max_attempts {
                        let delay = self.backoff.delay(attempt);
                        tracing::info!(
                            upstream = %self.name,
                            path,
                            attempt,
                            status,
                            delay_ms = delay.as_millis() as u64,
                            "retrying after upstream error"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(err) => {
                    self.breaker.record_failure();
                    last_failure = Some(LastFailure::Transport {
                        reason: err.to_string(),
                    });
                    if attempt + 1 < max_attempts {
                        let delay = self.backoff.delay(attempt);
                        tracing::warn!(
                            upstream = %self.name,
                            path,
                            attempt,
                            error = %err,
                            delay_ms = delay.as_millis() as u64,
                            "retrying after transport error"
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        match last_failure {
            Some(LastFailure::Http { status, body }) => {
                tracing::error!(upstream = %self.name, path, status, "retries exhausted on upstream error");
                RequestOutcome::Failure {
                    kind: FailureKind::UpstreamServerError,
                    status,
                    body,
                }
            }
            Some(LastFailure::Transport { reason }) => {
                tracing::error!(upstream = %self.name, path, %reason, "retries exhausted on transport error");
                RequestOutcome::Failure {
                    kind: FailureKind::RetriesExhausted,
                    status: 503,
                    body: error_body(
                        FailureKind::RetriesExhausted,
                        format!(
                            "unable to reach {} service after {} attempts: {}",
                            self.name, max_attempts, reason
                        ),
                    ),
                }
            }
            // Unreachable: max_attempts >= 1, so the loop body ran and either
            // returned or set last_failure.
            None => RequestOutcome::Failure {
                kind: FailureKind::TransportError,
                status: 503,
                body: error_body(
                    FailureKind::TransportError,
                    format!("{} service call made no attempts", self.name),
                ),
            },
        }
    }

    /// Send one request and read its body. A body-read failure (connection
    /// dropped mid-response, decode error) counts as a transport failure of
    /// the whole attempt, even when the status line already arrived.
    async fn attempt(
        &self,
        method: &Method,
        path: &str,
        query: Option<&[(String, String)]>,
        body: Option<&Value>,
        request_id: Option<&str>,
    ) -> Result<(u16, Value), reqwest::Error> {
        let url = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        let mut request = self.http.request(method.clone(), url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(id) = request_id {
            request = request.header(REQUEST_ID_HEADER, id);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let payload = read_body(response).await?;
        Ok((status, payload))
    }
}

/// Read and parse a response body, preserving non-JSON payloads as a plain
/// string and empty bodies as `null`.
async fn read_body(response: reqwest::Response) -> Result<Value, reqwest::Error> {
    let text = response.text().await?;
    if text.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Error envelope surfaced for failures the gateway itself produces.
fn error_body(kind: FailureKind, message: String) -> Value {
    json!({
        "error": {
            "code": kind.code(),
            "message": message,
        }
    })
}
