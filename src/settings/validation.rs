//! Settings validation.
//!
//! # Responsibilities
//! - Semantic checks that serde cannot express (ranges, required-when-enabled)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: `&Settings → Result<(), Vec<ValidationError>>`

use std::net::SocketAddr;
use thiserror::Error;

use crate::settings::schema::Settings;

/// A single semantic problem in a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

/// Check `settings` for semantic errors.
pub fn validate_settings(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.remote.enabled {
        if settings.remote.address.trim().is_empty() {
            errors.push(ValidationError::new("remote.address", "must not be empty"));
        }
        if settings.remote.key.trim().is_empty() {
            errors.push(ValidationError::new("remote.key", "must not be empty"));
        }
        if settings.remote.poll_interval_secs == 0 {
            errors.push(ValidationError::new("remote.poll_interval_secs", "must be greater than 0"));
        }
        if settings.remote.fetch_timeout_secs == 0 {
            errors.push(ValidationError::new("remote.fetch_timeout_secs", "must be greater than 0"));
        }
    }

    if settings.source.watch_file && settings.source.file.is_none() {
        errors.push(ValidationError::new("source.watch_file", "requires source.file"));
    }

    if settings.watcher.channel_capacity == 0 {
        errors.push(ValidationError::new("watcher.channel_capacity", "must be greater than 0"));
    }

    if settings.observability.metrics_enabled
        && settings.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", settings.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_remote_checks_only_when_enabled() {
        let mut settings = Settings::default();
        settings.remote.poll_interval_secs = 0;
        assert!(validate_settings(&settings).is_ok());

        settings.remote.enabled = true;
        let errors = validate_settings(&settings).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "remote.poll_interval_secs");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut settings = Settings::default();
        settings.remote.enabled = true;
        settings.remote.address = "  ".into();
        settings.remote.key = String::new();
        settings.source.watch_file = true;
        settings.watcher.channel_capacity = 0;
        settings.observability.metrics_enabled = true;
        settings.observability.metrics_address = "nowhere".into();

        let errors = validate_settings(&settings).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "remote.address",
                "remote.key",
                "source.watch_file",
                "watcher.channel_capacity",
                "observability.metrics_address",
            ]
        );
    }
}
