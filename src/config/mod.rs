//! Configuration subsystem: schema, loading, and semantic validation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CircuitBreakerConfig, CorsConfig, GatewayConfig, ListenerConfig, ObservabilityConfig,
    RateLimitConfig, RetryConfig, TimeoutConfig, UpstreamConfig, UpstreamsConfig,
};
pub use validation::{validate_config, ValidationError};
