//! Configuration validation.
//!
//! Serde handles syntax; this module handles semantics: value ranges the
//! resilience layer depends on, parseable addresses and URLs. Validation is
//! a pure function over the config and reports every error it finds, not
//! just the first.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("upstreams.{name}.base_url '{url}' is not a valid http(s) URL")]
    InvalidUpstreamUrl { name: &'static str, url: String },

    #[error("circuit_breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold,

    #[error("circuit_breaker.reset_timeout_secs must be a finite, non-negative number")]
    InvalidResetTimeout,

    #[error("retries.max_attempts must be at least 1")]
    ZeroMaxAttempts,

    #[error("retries.base_delay_ms must be greater than 0")]
    ZeroBaseDelay,

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("rate_limit.requests_per_second must be greater than 0 when rate limiting is enabled")]
    ZeroRateLimit,

    #[error("cors.allowed_origins contains '{0}', which is not a valid http(s) origin")]
    InvalidCorsOrigin(String),
}

/// Validate a configuration, collecting all semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for (name, upstream) in [
        ("data", &config.upstreams.data),
        ("model", &config.upstreams.model),
    ] {
        let parsed = Url::parse(&upstream.base_url);
        let valid = parsed
            .as_ref()
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false);
        if !valid {
            errors.push(ValidationError::InvalidUpstreamUrl {
                name,
                url: upstream.base_url.clone(),
            });
        }
    }

    if config.circuit_breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if !config.circuit_breaker.reset_timeout_secs.is_finite()
        || config.circuit_breaker.reset_timeout_secs < 0.0
    {
        errors.push(ValidationError::InvalidResetTimeout);
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::ZeroMaxAttempts);
    }
    if config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::ZeroBaseDelay);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.rate_limit.enabled && config.rate_limit.requests_per_second == 0 {
        errors.push(ValidationError::ZeroRateLimit);
    }

    for origin in &config.cors.allowed_origins {
        // A wildcard would panic tower-http's origin list at server build,
        // and credentialed CORS forbids it anyway; origins must be concrete.
        let valid = Url::parse(origin)
            .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
            .unwrap_or(false)
            && origin.parse::<axum::http::HeaderValue>().is_ok();
        if !valid {
            errors.push(ValidationError::InvalidCorsOrigin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
