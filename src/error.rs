//! Unified error types for Formrelay.
//!
//! Defines [`FormRelayError`] (startup and CLI failures),
//! [`ValidationError`] for config validation failures, and
//! [`SubmitError`] for the per-request faults the submission pipeline
//! does not recover from. All use `thiserror` for `Display` and `Error`
//! derives.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormRelayError {
    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[source] reqwest::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(StatusCode),
}

/// Faults that abort a single submission.
///
/// These are never turned into a structured upstream passthrough; the
/// caller receives a generic JSON error and the fault is logged.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("multipart parsing failed: {0}")]
    Parse(#[from] multer::Error),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("upstream URL could not be built: {0}")]
    UpstreamUrl(#[from] url::ParseError),

    #[error("upstream request failed: {0}")]
    UpstreamTransport(#[from] reqwest::Error),
}

impl SubmitError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Parse(_) | Self::UpstreamUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::Parse(_) => "Failed to parse multipart body",
            Self::PayloadTooLarge { .. } => "Payload too large",
            Self::UpstreamUrl(_) => "Failed to build upstream URL",
            Self::UpstreamTransport(_) => "Upstream request failed",
        };
        (self.status(), Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_listed_one_per_line() {
        let err = FormRelayError::ConfigValidation {
            errors: vec![
                ValidationError {
                    field: "upstream".into(),
                    message: "not a valid URL".into(),
                    suggestion: Some("include a scheme".into()),
                },
                ValidationError {
                    field: "path".into(),
                    message: "must start with '/'".into(),
                    suggestion: None,
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Config validation failed:\n  upstream: not a valid URL (include a scheme)\n  path: must start with '/'"
        );
    }

    #[test]
    fn parse_errors_map_to_internal_server_error() {
        let err = SubmitError::Parse(multer::Error::IncompleteStream);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unbuildable_upstream_url_is_an_internal_error() {
        let err = SubmitError::from(url::ParseError::InvalidDomainCharacter);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn oversized_body_maps_to_payload_too_large() {
        let err = SubmitError::PayloadTooLarge { limit: 10 };
        assert_eq!(err.to_string(), "request body exceeds 10 bytes");
        assert_eq!(err.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
