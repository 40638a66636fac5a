//! Upstream response relay.
//!
//! The upstream body is parsed as JSON when possible and wrapped as
//! `{ "raw": <text> }` otherwise. Failures keep the upstream status and
//! nest the body under `detail`; successes are always answered with 200.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub const UPSTREAM_ERROR: &str = "HubSpot error";

#[must_use]
pub fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "raw": text }))
}

#[must_use]
pub fn relay(status: StatusCode, text: &str) -> Response {
    let body = parse_body(text);
    if status.is_success() {
        (StatusCode::OK, Json(body)).into_response()
    } else {
        (
            status,
            Json(json!({ "error": UPSTREAM_ERROR, "detail": body })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn json_body(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_status_is_forced_to_ok() {
        let resp = relay(StatusCode::CREATED, r#"{"id":"abc"}"#);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!({ "id": "abc" }));
    }

    #[tokio::test]
    async fn failure_keeps_status_and_nests_detail() {
        let resp = relay(StatusCode::UNPROCESSABLE_ENTITY, r#"{"msg":"bad"}"#);
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(resp).await,
            json!({ "error": "HubSpot error", "detail": { "msg": "bad" } })
        );
    }

    #[tokio::test]
    async fn non_json_failure_is_wrapped() {
        let resp = relay(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(resp).await,
            json!({ "error": "HubSpot error", "detail": { "raw": "<html>oops</html>" } })
        );
    }

    #[test]
    fn text_bodies_are_wrapped_as_raw() {
        assert_eq!(parse_body("OK"), json!({ "raw": "OK" }));
        assert_eq!(parse_body(""), json!({ "raw": "" }));
    }

    #[test]
    fn json_scalars_pass_through() {
        assert_eq!(parse_body("42"), json!(42));
        assert_eq!(parse_body(" [1, 2] "), json!([1, 2]));
    }
}
