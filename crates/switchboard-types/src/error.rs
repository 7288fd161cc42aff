use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capability::Capability;

/// Errors produced while dispatching a generation request.
///
/// Only [`DispatchError::Upstream`] and [`DispatchError::Parse`] are eligible
/// for the fallback hop; everything else means the request or the deployment
/// is broken, not that a provider is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchError {
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("invalid request: {message}")]
    Validation { message: String },

    #[error("upstream error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("daily limit reached for all {capability} providers")]
    QuotaExhausted { capability: Capability },

    #[error("unexpected response shape: {message}")]
    Parse { message: String },

    #[error("unknown capability: '{name}'")]
    UnknownCapability { name: String },
}

impl DispatchError {
    pub fn configuration(message: impl Into<String>) -> Self {
        DispatchError::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DispatchError::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        DispatchError::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        DispatchError::Parse {
            message: message.into(),
        }
    }

    /// Whether this failure allows the single fallback hop.
    pub fn is_fallback_eligible(&self) -> bool {
        matches!(
            self,
            DispatchError::Upstream { .. } | DispatchError::Parse { .. }
        )
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("capability '{0}' has no providers")]
    EmptyCapability(Capability),

    #[error("capability '{capability}' lists provider '{name}' more than once")]
    DuplicateProvider { capability: Capability, name: String },

    #[error("capability '{capability}' designates fallback '{name}', which is not in its provider list")]
    UnknownFallback { capability: Capability, name: String },

    #[error("capability '{capability}' designates fallback '{name}', which has a daily limit")]
    BoundedFallback { capability: Capability, name: String },

    #[error("capability '{0}' is configured more than once")]
    DuplicateCapability(Capability),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_eligibility() {
        assert!(DispatchError::upstream(Some(500), "boom").is_fallback_eligible());
        assert!(DispatchError::parse("no choices").is_fallback_eligible());
        assert!(!DispatchError::configuration("missing key").is_fallback_eligible());
        assert!(!DispatchError::validation("empty prompt").is_fallback_eligible());
        assert!(
            !DispatchError::QuotaExhausted {
                capability: Capability::Image
            }
            .is_fallback_eligible()
        );
    }

    #[test]
    fn test_upstream_display_includes_status() {
        let err = DispatchError::upstream(Some(503), "Service Unavailable");
        assert_eq!(err.to_string(), "upstream error (HTTP 503): Service Unavailable");

        let err = DispatchError::upstream(None, "connection refused");
        assert_eq!(err.to_string(), "upstream error: connection refused");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::BoundedFallback {
            capability: Capability::Image,
            name: "SDXL".to_string(),
        };
        assert!(err.to_string().contains("SDXL"));
        assert!(err.to_string().contains("daily limit"));
    }
}
