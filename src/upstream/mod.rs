//! Outbound calls to the backend services.
//!
//! # Responsibilities
//! - Hold one resilient client per upstream (data service, model service)
//! - Gate every call through the upstream's circuit breaker
//! - Retry transient failures with exponential backoff
//! - Classify every terminal result into a [`RequestOutcome`]
//!
//! # Design Decisions
//! - Clients are constructed once at startup and handed to the HTTP layer
//!   through application state; no module-level singletons
//! - The HTTP transport is a shared, connection-pooled `reqwest::Client`
//!   rather than a per-call connection

pub mod client;
pub mod outcome;

pub use client::UpstreamClient;
pub use outcome::{FailureKind, RequestOutcome};
