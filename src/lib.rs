//! beatbooks-gateway
//!
//! API gateway for the BeatTheBooks platform: a unified HTTP surface in
//! front of the data-retrieval service and the prediction-model service.
//!
//! # Architecture Overview
//!
//! ```text
//!  Client ──▶ http (axum server, middleware, thin route handlers)
//!                 │
//!                 ▼
//!          upstream (resilient client, one per backend service)
//!                 │
//!        ┌────────┴─────────┐
//!        ▼                  ▼
//!  resilience           resilience
//!  circuit breaker      backoff policy
//!        │
//!        ▼
//!  data service (:8001) / model service (:8002)
//!
//!  Cross-cutting: config, observability (structured logs),
//!                 security (rate limit), lifecycle (shutdown)
//! ```
//!
//! The resilient forwarding layer is the heart of the crate: every outbound
//! call passes a circuit-breaker admission check, then a bounded retry loop
//! with exponential backoff, and comes back as one classified
//! [`upstream::RequestOutcome`]. Client errors (4xx) surface immediately and
//! never count against the breaker; server errors and transport failures
//! retry and feed it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;
pub mod upstream;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
