//! Optional Sentry error tracking integration.
//!
//! [`init`] starts the SDK; the returned guard must be held for the
//! lifetime of the application. [`capture_submit_error`] reports a failed
//! submission tagged with its correlation id so it can be matched with
//! the relay's logs.

use crate::error::SubmitError;

pub fn init(dsn: &str, environment: Option<&str>) -> sentry::ClientInitGuard {
    let parsed_dsn = match dsn.parse() {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(error = %e, "invalid Sentry DSN, error tracking disabled");
            None
        }
    };

    sentry::init(sentry::ClientOptions {
        dsn: parsed_dsn,
        environment: environment.map(|e| e.to_string().into()),
        release: Some(concat!("formrelay@", env!("CARGO_PKG_VERSION")).into()),
        ..Default::default()
    })
}

pub fn capture_submit_error(error: &SubmitError, correlation_id: &str) {
    sentry::with_scope(
        |scope| {
            scope.set_tag("correlation_id", correlation_id);
            scope.set_tag("status", error.status().as_u16());
        },
        || sentry::capture_error(error),
    );
}
