//! Upstream endpoint configuration and URL construction.
//!
//! [`UpstreamConfig`] holds the base URL template of the forms API with a
//! `{region}` placeholder. [`UpstreamConfig::submission_url`] expands it
//! for one submission and appends the multipart submission path with the
//! portal and form identifiers percent-encoded as path segments.
//! [`validate`] checks the runtime settings once at startup.

use url::Url;

use crate::error::ValidationError;
use crate::submit::control::{ControlParameters, DEFAULT_REGION};

pub const DEFAULT_UPSTREAM_TEMPLATE: &str = "https://forms-{region}.hsforms.com";
pub const DEFAULT_SUBMIT_PATH: &str = "/api/hs-multipart-proxy";

const REGION_PLACEHOLDER: &str = "{region}";
const SUBMISSION_PATH: [&str; 6] = [
    "submissions",
    "v3",
    "public",
    "submit",
    "formsnext",
    "multipart",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub base_template: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self::new(DEFAULT_UPSTREAM_TEMPLATE)
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn new(base_template: impl Into<String>) -> Self {
        Self {
            base_template: base_template.into(),
        }
    }

    /// Build the submission endpoint for one set of control parameters.
    ///
    /// The region is interpolated verbatim into the template, so a region
    /// that breaks the host makes this fail.
    pub fn submission_url(&self, control: &ControlParameters) -> Result<Url, url::ParseError> {
        let base = self.base_template.replace(REGION_PLACEHOLDER, &control.region);
        let mut url = Url::parse(&base)?;
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(SUBMISSION_PATH)
            .push(&control.portal_id)
            .push(&control.form_id);
        Ok(url)
    }
}

/// Validate the relay settings. Returns every problem found, not just the first.
pub fn validate(upstream: &UpstreamConfig, submit_path: &str) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !submit_path.starts_with('/') {
        errors.push(ValidationError {
            field: "path".into(),
            message: format!("'{submit_path}' must start with '/'"),
            suggestion: Some(format!("did you mean '/{submit_path}'?")),
        });
    } else if submit_path == "/health" {
        errors.push(ValidationError {
            field: "path".into(),
            message: "'/health' is reserved for the health endpoint".into(),
            suggestion: Some(format!("try '{DEFAULT_SUBMIT_PATH}'")),
        });
    }

    let sample = upstream
        .base_template
        .replace(REGION_PLACEHOLDER, DEFAULT_REGION);
    match Url::parse(&sample) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                errors.push(ValidationError {
                    field: "upstream".into(),
                    message: format!("unsupported scheme '{scheme}' (expected http or https)"),
                    suggestion: None,
                });
            } else if parsed.query().is_some() || parsed.fragment().is_some() {
                errors.push(ValidationError {
                    field: "upstream".into(),
                    message: "template must not carry a query string or fragment".into(),
                    suggestion: None,
                });
            }
        }
        Err(e) => errors.push(ValidationError {
            field: "upstream".into(),
            message: format!("'{}' is not a valid URL: {e}", upstream.base_template),
            suggestion: Some(format!("e.g. '{DEFAULT_UPSTREAM_TEMPLATE}'")),
        }),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
