//! Response builders

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;
use utena_protocol::ErrorResponse;
use utena_utils::{ErrorKind, UtenaError};

pub type HttpResponse = Response<Full<Bytes>>;

/// Serialize `body` as the JSON response
pub fn json<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(bytes)))
            .unwrap(),
        Err(e) => error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

pub fn text(status: StatusCode, body: &'static str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

pub fn empty(status: StatusCode) -> HttpResponse {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// `{"status": "<reason>", "error": "<message>"}`
pub fn error(status: StatusCode, message: &str) -> HttpResponse {
    let body = ErrorResponse {
        status: status.canonical_reason().unwrap_or("Unknown").to_string(),
        error: message.to_string(),
    };
    let bytes = serde_json::to_vec(&body).unwrap_or_default();

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(bytes)))
        .unwrap()
}

pub fn status_for(err: &UtenaError) -> StatusCode {
    match err.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidArgument | ErrorKind::AlreadyExists => StatusCode::BAD_REQUEST,
        ErrorKind::DispatchFailed | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn from_error(err: &UtenaError) -> HttpResponse {
    error(status_for(err), &err.to_string())
}

pub fn bad_request(message: &str) -> HttpResponse {
    error(StatusCode::BAD_REQUEST, message)
}

pub fn not_found() -> HttpResponse {
    error(StatusCode::NOT_FOUND, "no such route")
}
