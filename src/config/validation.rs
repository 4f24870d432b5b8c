//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream target is a usable http(s) URL
//! - Validate value ranges (temperature, limits, timeouts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every semantic constraint, collecting all failures.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.upstream.target) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.host().is_some() => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.target",
            format!("unsupported target '{}', expected an http(s) URL with a host", url),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.target",
            format!("invalid URL '{}': {}", config.upstream.target, e),
        )),
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.request_timeout_secs", "must be greater than 0"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.connect_timeout_secs", "must be greater than 0"));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    let interception = &config.interception;
    for (field, path) in [
        ("interception.messages_path", &interception.messages_path),
        ("interception.count_tokens_path", &interception.count_tokens_path),
    ] {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field, format!("'{}' must start with '/'", path)));
        }
    }
    if interception.messages_path == interception.count_tokens_path {
        errors.push(ValidationError::new(
            "interception.count_tokens_path",
            "must differ from messages_path",
        ));
    }
    if interception.target_model.trim().is_empty() {
        errors.push(ValidationError::new("interception.target_model", "must not be empty"));
    }
    if interception.suppressed_model.trim().is_empty() {
        errors.push(ValidationError::new("interception.suppressed_model", "must not be empty"));
    }
    if !(0.0..=1.0).contains(&interception.temperature) {
        errors.push(ValidationError::new(
            "interception.temperature",
            format!("{} is outside 0.0..=1.0", interception.temperature),
        ));
    }
    if interception.description_limit == 0 {
        errors.push(ValidationError::new("interception.description_limit", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
