use serde_json::{Value, json};
use thiserror::Error;

use switchboard_types::error::DispatchError;

/// Relay failures, each mapping to an HTTP status and `{error, ...}` body.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Secret missing from the environment. `message` is caller-facing.
    #[error("{message}")]
    MissingSecret { message: String },

    #[error("{0}")]
    Validation(String),

    /// Upstream answered with a non-2xx status.
    #[error("{upstream} API request failed (HTTP {status})")]
    Upstream {
        upstream: &'static str,
        status: u16,
        details: String,
    },

    /// Network failure or unreadable upstream body.
    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MissingSecret { .. } => 500,
            RelayError::Validation(_) => 400,
            RelayError::Upstream { status, .. } => *status,
            RelayError::Internal(_) => 500,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            RelayError::MissingSecret { message } => json!({ "error": message }),
            RelayError::Validation(message) => json!({ "error": message }),
            RelayError::Upstream {
                upstream,
                status,
                details,
            } => json!({
                "status": status,
                "error": format!("{upstream} API request failed"),
                "details": details,
            }),
            RelayError::Internal(message) => json!({
                "error": "Internal server error",
                "message": message,
            }),
        }
    }

    /// Recover a relay-local rejection from a non-2xx reply.
    ///
    /// Missing-secret and validation bodies carry `error` alone; forwarded
    /// upstream failures add `status`/`details` and transport failures add
    /// `message`, so those yield `None`.
    pub fn from_reply(status: u16, body: &str) -> Option<RelayError> {
        let value: Value = serde_json::from_str(body).ok()?;
        let object = value.as_object()?;
        if object.len() != 1 {
            return None;
        }
        let message = object.get("error")?.as_str()?.to_string();
        match status {
            400 => Some(RelayError::Validation(message)),
            500 => Some(RelayError::MissingSecret { message }),
            _ => None,
        }
    }
}

impl From<RelayError> for DispatchError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MissingSecret { message } => DispatchError::configuration(message),
            RelayError::Validation(message) => DispatchError::validation(message),
            RelayError::Upstream {
                status, details, ..
            } => DispatchError::upstream(Some(status), details),
            RelayError::Internal(message) => DispatchError::upstream(None, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_mirrors_status() {
        let err = RelayError::Upstream {
            upstream: "DeepSeek",
            status: 429,
            details: "rate limited".into(),
        };
        assert_eq!(err.status_code(), 429);
        assert_eq!(
            err.body(),
            json!({"status": 429, "error": "DeepSeek API request failed", "details": "rate limited"})
        );
    }

    #[test]
    fn test_local_rejections_recovered_from_reply() {
        let missing = RelayError::MissingSecret {
            message: "DeepSeek API key not configured".into(),
        };
        let recovered =
            RelayError::from_reply(missing.status_code(), &missing.body().to_string()).unwrap();
        assert_eq!(
            DispatchError::from(recovered),
            DispatchError::configuration("DeepSeek API key not configured")
        );

        let invalid = RelayError::Validation("Messages array is required".into());
        let recovered =
            RelayError::from_reply(invalid.status_code(), &invalid.body().to_string()).unwrap();
        assert!(matches!(
            DispatchError::from(recovered),
            DispatchError::Validation { .. }
        ));
    }

    #[test]
    fn test_forwarded_failures_are_not_local_rejections() {
        let upstream = RelayError::Upstream {
            upstream: "DeepSeek",
            status: 400,
            details: "bad model".into(),
        };
        assert!(RelayError::from_reply(400, &upstream.body().to_string()).is_none());

        let internal = RelayError::Internal("connection reset".into());
        assert!(RelayError::from_reply(500, &internal.body().to_string()).is_none());
        assert!(RelayError::from_reply(500, "Internal Server Error").is_none());
        assert!(RelayError::from_reply(502, r#"{"error":"bad gateway"}"#).is_none());
    }

    #[test]
    fn test_internal_error_body() {
        let err = RelayError::Internal("connection reset".into());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.body()["error"], "Internal server error");
        assert_eq!(err.body()["message"], "connection reset");
    }
}
