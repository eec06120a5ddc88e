//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → circuit_breaker.rs (admission check, once per logical call)
//!     → upstream client attempt loop
//!     → On retryable failure: backoff.rs (exponential delay + jitter)
//!     → circuit_breaker.rs (record success/failure per attempt)
//! ```
//!
//! # Design Decisions
//! - The breaker is an admission gate checked once per forwarded call, not
//!   per attempt; retries run beneath an already-admitted call
//! - Breaker policy (threshold, reset timeout) and retry policy (attempts,
//!   base delay) are tuned independently
//! - Only server errors and transport failures feed the breaker; 4xx
//!   responses indicate a caller mistake, not upstream distress

pub mod backoff;
pub mod circuit_breaker;

pub use backoff::BackoffPolicy;
pub use circuit_breaker::{CircuitBreaker, CircuitState};
