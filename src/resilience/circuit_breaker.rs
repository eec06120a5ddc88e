//! Circuit breaker for upstream protection.
//!
//! # States
//! - Closed: normal operation, requests pass through
//! - Open: upstream assumed down, requests fail fast
//! - Half-Open: testing if the upstream recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures >= failure_threshold
//! Open → Half-Open: reset_timeout elapsed since last failure (lazy, on read)
//! Half-Open → Closed: probe request succeeds
//! Half-Open → Open: probe request fails
//! ```
//!
//! # Design Decisions
//! - One breaker per upstream (not global), shared by all in-flight requests
//! - Open → Half-Open is computed when state is read; no background timer
//! - Half-Open probes are not serialized: concurrent callers arriving after
//!   the timeout may all be admitted as probes

use std::num::NonZeroU32;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Current position in the breaker state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    last_failure: Option<Instant>,
}

/// Failure detector for a single upstream dependency.
///
/// All fields that change per request live behind one mutex so that
/// concurrent `record_failure` calls cannot lose updates or miscount the
/// threshold crossing.
#[derive(Debug)]
pub struct CircuitBreaker {
    failure_threshold: NonZeroU32,
    reset_timeout: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a breaker. A zero failure threshold is unrepresentable by
    /// construction (`NonZeroU32`).
    pub fn new(failure_threshold: NonZeroU32, reset_timeout: Duration) -> Self {
        Self {
            failure_threshold,
            reset_timeout,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                last_failure: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("circuit breaker mutex poisoned")
    }

    /// Read the current state, applying the lazy Open → Half-Open transition
    /// when the reset timeout has elapsed since the last failure.
    pub fn state(&self) -> CircuitState {
        let mut inner = self.lock();
        if inner.state == CircuitState::Open {
            let cooled_down = inner
                .last_failure
                .is_some_and(|at| at.elapsed() >= self.reset_timeout);
            if cooled_down {
                inner.state = CircuitState::HalfOpen;
            }
        }
        inner.state
    }

    /// Whether a new request may be attempted right now.
    ///
    /// True in Closed and Half-Open, false in Open. The only mutation this
    /// may perform is the lazy read-side transition in
    /// [`state`](CircuitBreaker::state).
    pub fn allow_request(&self) -> bool {
        self.state() != CircuitState::Open
    }

    /// Record a successful upstream call: reset the counter and close.
    pub fn record_success(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = 0;
        inner.state = CircuitState::Closed;
    }

    /// Record a failed upstream call.
    ///
    /// Opens the circuit when the threshold is crossed, and re-opens
    /// immediately from Half-Open (a failed probe is never threshold-gated).
    pub fn record_failure(&self) {
        let mut inner = self.lock();
        inner.consecutive_failures = inner.consecutive_failures.saturating_add(1);
        inner.last_failure = Some(Instant::now());
        if inner.state == CircuitState::HalfOpen
            || inner.consecutive_failures >= self.failure_threshold.get()
        {
            inner.state = CircuitState::Open;
        }
    }

    /// Current consecutive failure count.
    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }
}
