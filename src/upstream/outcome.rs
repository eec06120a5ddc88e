//! Classified results of forwarded upstream calls.

use serde_json::Value;

/// Why a forwarded call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 4xx from the upstream. Surfaced verbatim, never retried, never
    /// counted against the circuit breaker.
    UpstreamClientError,
    /// 5xx from the upstream, either non-retryable or after retries were
    /// exhausted on a retryable status.
    UpstreamServerError,
    /// Connection, DNS, or timeout failure on the final attempt.
    TransportError,
    /// The circuit breaker refused admission; no network call was made.
    CircuitOpen,
    /// Every attempt ended in a transport failure.
    RetriesExhausted,
}

impl FailureKind {
    /// Classify an upstream HTTP error status.
    pub fn from_status(status: u16) -> Self {
        if status < 500 {
            FailureKind::UpstreamClientError
        } else {
            FailureKind::UpstreamServerError
        }
    }

    /// Machine-readable error code surfaced to gateway clients.
    ///
    /// Circuit-open is distinguishable from generic unavailability so that
    /// callers can tell a fast-fail from an exhausted upstream.
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::UpstreamClientError => "UPSTREAM_CLIENT_ERROR",
            FailureKind::UpstreamServerError => "UPSTREAM_SERVER_ERROR",
            FailureKind::TransportError | FailureKind::RetriesExhausted => "SERVICE_UNAVAILABLE",
            FailureKind::CircuitOpen => "CIRCUIT_OPEN",
        }
    }
}

/// Terminal result of one logical forwarded call.
///
/// Callers never see intermediate attempt failures; retries and
/// classification happen inside the client.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// Upstream answered with a status below 400; payload is the parsed
    /// response body.
    Success(Value),
    /// The call failed; `status` is what the gateway surfaces to its caller.
    Failure {
        kind: FailureKind,
        status: u16,
        body: Value,
    },
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RequestOutcome::Success(_))
    }

    /// Failure kind, if this outcome is a failure.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            RequestOutcome::Success(_) => None,
            RequestOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Surfaced HTTP status (200 for success outcomes).
    pub fn status(&self) -> u16 {
        match self {
            RequestOutcome::Success(_) => 200,
            RequestOutcome::Failure { status, .. } => *status,
        }
    }
}
