//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Every body this service sends is JSON, so a [`Response`] is just a status
//! and serialized bytes. Handlers usually return [`Json`] or
//! `Result<Json<T>, ApiError>` and let the conversion do the rest.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderValue};
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

use crate::status::Status;

const APPLICATION_JSON: &str = "application/json";

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing `application/json` response.
#[derive(Debug)]
pub struct Response {
    status: Status,
    body: Vec<u8>,
}

impl Response {
    /// `200 OK` with already-serialized JSON bytes.
    pub fn json(body: Vec<u8>) -> Self {
        Self { status: Status::Ok, body }
    }

    /// An error envelope: `{"error": message}`.
    pub fn error(status: Status, message: &str) -> Self {
        #[derive(Serialize)]
        struct Envelope<'a> {
            error: &'a str,
        }

        let body = serde_json::to_vec(&Envelope { error: message })
            .unwrap_or_else(|_| br#"{"error":"internal error"}"#.to_vec());
        Self { status, body }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.into()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(Bytes::from(self.body)));
        *res.status_mut() = self.status.into();
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        res
    }
}

// ── Json ─────────────────────────────────────────────────────────────────────

/// Serializes `T` as the `200 OK` body.
#[derive(Debug)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => Response::json(bytes),
            Err(e) => {
                error!("failed to serialize response body: {e}");
                Response::error(Status::InternalServerError, "internal error")
            }
        }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`]. Anything a handler returns must
/// implement it.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn json_wrapper_serializes_value() {
        let response = Json(vec![1, 2, 3]).into_response();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.body(), b"[1,2,3]");
    }

    #[test]
    fn error_envelope_escapes_message() {
        let response = Response::error(Status::BadRequest, r#"bad "quote""#);
        assert_eq!(response.body(), br#"{"error":"bad \"quote\""}"#);
    }

    #[test]
    fn result_picks_the_matching_branch() {
        let ok: Result<Json<&str>, ApiError> = Ok(Json("hi"));
        assert_eq!(ok.into_response().status_code(), 200);

        let err: Result<Json<&str>, ApiError> = Err(ApiError::NotFound);
        assert_eq!(err.into_response().status_code(), 404);
    }

    #[test]
    fn hyper_response_carries_status_and_content_type() {
        let res = Response::error(Status::MethodNotAllowed, "method not allowed").into_inner();
        assert_eq!(res.status(), http::StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[CONTENT_TYPE], APPLICATION_JSON);
    }
}
