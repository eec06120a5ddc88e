//! Inbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! Client request
//!     → server.rs (axum setup, middleware stack)
//!     → middleware/ (request ID, access log, rate limit)
//!     → routes.rs (thin delegate handlers)
//!     → upstream client (resilient forwarding)
//!     → response.rs (outcome → HTTP response)
//! ```

pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;

pub use middleware::{RequestId, REQUEST_ID_HEADER};
pub use server::{AppState, GatewayServer, ServerError};
