//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstreams.data]
            base_url = "http://10.0.0.5:8001"

            [circuit_breaker]
            failure_threshold = 2
            reset_timeout_secs = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.upstreams.data.base_url, "http://10.0.0.5:8001");
        assert_eq!(config.upstreams.model.base_url, "http://localhost:8002");
        assert_eq!(config.circuit_breaker.failure_threshold, 2);
        assert_eq!(config.retries.max_attempts, 3);
    }

    #[test]
    fn validation_errors_surface_through_loader() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("beatbooks-gateway-test-{}.toml", std::process::id()));
        fs::write(&path, "[retries]\nmax_attempts = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("max_attempts"));

        let _ = fs::remove_file(&path);
    }
}
