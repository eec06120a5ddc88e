//! Observability subsystem.
//!
//! Structured logs carry the request ID through every layer; the access-log
//! middleware in `http` emits the per-request line, and the upstream client
//! logs each retry and circuit transition at the point it happens.

pub mod logging;
