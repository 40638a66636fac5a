//! The submission pipeline.
//!
//! [`submit_handler`] is mounted on the configured submission path and
//! runs every stage in order: method gate, multipart ingestion
//! ([`form`]), control field extraction ([`control`]), upstream URL
//! construction, outbound body construction ([`outbound`]), one upstream
//! POST, and the response relay ([`relay`]).

pub mod control;
pub mod form;
pub mod outbound;
pub mod relay;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::SubmitError;
use crate::server::AppState;
use control::{ControlParameters, MISSING_IDENTIFIERS};

const CORRELATION_HEADER: &str = "x-correlation-id";

pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    req_headers: HeaderMap,
    body: Body,
) -> Response {
    let correlation_id = req_headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let mut response = match submit(&state, &method, &req_headers, body, &correlation_id).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                error = %e,
                "submission failed"
            );
            #[cfg(feature = "sentry-integration")]
            crate::sentry_integration::capture_submit_error(&e, &correlation_id);
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            e.into_response()
        }
    };

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

async fn submit(
    state: &AppState,
    method: &Method,
    req_headers: &HeaderMap,
    body: Body,
    correlation_id: &str,
) -> Result<Response, SubmitError> {
    if *method != Method::POST {
        tracing::info!(
            correlation_id = %correlation_id,
            method = %method,
            "method not allowed"
        );
        state.stats.rejected.fetch_add(1, Ordering::Relaxed);
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            Json(json!({ "error": "Method not allowed" })),
        )
            .into_response());
    }

    form::check_declared_length(req_headers, state.max_body)?;
    let boundary = form::boundary(req_headers)?;
    let submitted = form::parse(body, boundary, state.max_body).await?;

    let Some(control) = ControlParameters::extract(&submitted) else {
        tracing::info!(
            correlation_id = %correlation_id,
            reason = MISSING_IDENTIFIERS,
            "submission rejected"
        );
        state.stats.rejected.fetch_add(1, Ordering::Relaxed);
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": MISSING_IDENTIFIERS })),
        )
            .into_response());
    };

    // No allow-list: the region lands in the upstream host as sent.
    let url = state.upstream.submission_url(&control)?;

    tracing::info!(
        correlation_id = %correlation_id,
        portal_id = %control.portal_id,
        form_id = %control.form_id,
        region = %control.region,
        fields = submitted.fields().len(),
        files = submitted.files().len(),
        "submission received"
    );

    let outbound = outbound::build_form(submitted)?;

    let start = std::time::Instant::now();
    let upstream_response = state.http_client.post(url).multipart(outbound).send().await?;
    let status = upstream_response.status();
    let text = upstream_response.text().await?;

    #[allow(clippy::cast_possible_truncation)]
    let latency_ms = start.elapsed().as_millis() as u64;
    if status.is_success() {
        state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            correlation_id = %correlation_id,
            status = status.as_u16(),
            latency_ms,
            "upstream accepted submission"
        );
    } else {
        state.stats.upstream_errors.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            correlation_id = %correlation_id,
            status = status.as_u16(),
            latency_ms,
            "upstream rejected submission"
        );
    }

    Ok(relay::relay(status, &text))
}
