//! Configuration validation.
//!
//! Returns all validation errors, not just the first.

use std::fmt;

use crate::config::schema::RpcConfig;

/// A single semantic problem in the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
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

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check RPC settings for values serde cannot reject on its own.
pub fn validate_rpc(config: &RpcConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.timeout_secs == 0 {
        errors.push(ValidationError::new("rpc.timeout_secs", "must be greater than 0"));
    }
    if config.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "rpc.receipt_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "rpc.poll_interval_ms",
            "must be greater than 0",
        ));
    }

    if let Some(url) = &config.url {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError::new("rpc.url", format!("'{}' is not a valid URL: {}", url, e)));
        }
    }
    for url in &config.failover_urls {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "rpc.failover_urls",
                format!("'{}' is not a valid URL: {}", url, e),
            ));
        }
    }

    if let Some(url) = &config.mirror_url {
        if let Err(e) = url.parse::<url::Url>() {
            errors.push(ValidationError::new(
                "rpc.mirror_url",
                format!("'{}' is not a valid URL: {}", url, e),
            ));
        }
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
    fn test_default_is_valid() {
        assert!(validate_rpc(&RpcConfig::default()).is_ok());
    }

    #[test]
    fn test_reports_every_error() {
        let config = RpcConfig {
            url: Some("not a url".to_string()),
            failover_urls: vec!["also bad".to_string()],
            mirror_url: Some("mirror".to_string()),
            timeout_secs: 0,
            receipt_timeout_secs: 0,
            poll_interval_ms: 0,
        };
        let errors = validate_rpc(&config).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors[0].field, "rpc.timeout_secs");
        assert!(errors[3].to_string().starts_with("rpc.url: 'not a url'"));
        assert_eq!(errors[5].field, "rpc.mirror_url");
    }
}
