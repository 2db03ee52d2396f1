//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    http::{
        Method, StatusCode,
        header::{CONTENT_TYPE, HeaderMap},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::Value;

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

const REDACTED: &str = "********";

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If the response body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and logged in full at the `debug` level.
///
/// Passwords in form and JSON request bodies are replaced with asterisks
/// before they are logged. The bodies passed on are the original bytes.
///
/// Request bodies are buffered under axum's `DefaultBodyLimit`, so a body
/// over the limit is answered with 413 before any handler runs.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match Bytes::from_request(Request::from_parts(parts.clone(), body), &()).await
    {
        Ok(bytes) => bytes,
        Err(rejection) => {
            tracing::warn!("could not read request body: {rejection}");
            return rejection.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body_bytes);
    if parts.method == Method::GET || parts.method == Method::DELETE {
        log_request(&parts, &body_text);
    } else {
        log_request(&parts, &redact_body(&parts.headers, &body_text));
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

fn redact_body(headers: &HeaderMap, body_text: &str) -> String {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        redact_form_password(body_text, "password")
    } else if content_type.starts_with("application/json") {
        redact_json_password(body_text)
    } else {
        body_text.to_owned()
    }
}

fn redact_form_password(form_text: &str, field_name: &str) -> String {
    form_text
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == field_name => format!("{field_name}={REDACTED}"),
            _ => pair.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn redact_json_password(json_text: &str) -> String {
    let mut value: Value = match serde_json::from_str(json_text) {
        Ok(value) => value,
        // Not valid JSON, so the handler will reject it anyway.
        Err(_) => return json_text.to_owned(),
    };

    if let Some(password) = value.get_mut("password") {
        *password = Value::String(REDACTED.to_owned());
    }

    value.to_string()
}

/// Truncate `text` to at most [LOG_BODY_LENGTH_LIMIT] bytes on a char boundary.
fn truncate(text: &str) -> Option<&str> {
    if text.len() <= LOG_BODY_LENGTH_LIMIT {
        return None;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    Some(&text[..end])
}

fn log_request(headers: &axum::http::request::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Received request: {headers:#?}\nbody: {truncated:}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {headers:#?}\nbody: {body:?}"),
    }
}

fn log_response(headers: &axum::http::response::Parts, body: &str) {
    match truncate(body) {
        Some(truncated) => {
            tracing::info!("Sending response: {headers:#?}\nbody: {truncated:}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {headers:#?}\nbody: {body:?}"),
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, body::Bytes, http::StatusCode, middleware, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use super::{
        LOG_BODY_LENGTH_LIMIT, logging_middleware, redact_form_password, redact_json_password,
        truncate,
    };

    #[test]
    fn redacts_form_password() {
        let redacted = redact_form_password("username=foo%40bar.baz&password=hunter2", "password");

        assert_eq!(redacted, "username=foo%40bar.baz&password=********");
    }

    #[test]
    fn leaves_form_without_password_alone() {
        let redacted = redact_form_password("username=foo", "password");

        assert_eq!(redacted, "username=foo");
    }

    #[test]
    fn redacts_json_password() {
        let redacted = redact_json_password(r#"{"email":"foo@bar.baz","password":"hunter2"}"#);

        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains("foo@bar.baz"));
    }

    #[test]
    fn truncates_on_char_boundary() {
        let text = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate(&text).unwrap();

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(text.starts_with(truncated));
        assert_eq!(truncate("short"), None);
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        async fn echo(Json(body): Json<Value>) -> Json<Value> {
            Json(body)
        }

        let app = Router::new()
            .route("/echo", post(echo))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = json!({ "password": "hunter2", "note": "x".repeat(100) });

        let response = server.post("/echo").json(&body).await;

        response.assert_status_ok();
        response.assert_json(&body);
    }

    #[tokio::test]
    async fn forwards_request_bytes_unchanged() {
        async fn debug_bytes(body: Bytes) -> String {
            format!("{:?}", body.as_ref())
        }

        let app = Router::new()
            .route("/bytes", post(debug_bytes))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let raw = Bytes::from_static(b"Fo\xFFo");

        let response = server.post("/bytes").bytes(raw.clone()).await;

        response.assert_status_ok();
        response.assert_text(format!("{:?}", raw.as_ref()));
    }

    #[tokio::test]
    async fn rejects_request_body_over_limit() {
        async fn ok() -> &'static str {
            "ok"
        }

        let app = Router::new()
            .route("/anything", post(ok))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let oversized = Bytes::from(vec![b'a'; 2 * 1024 * 1024 + 1]);

        server
            .post("/anything")
            .bytes(oversized)
            .await
            .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
