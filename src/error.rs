//! Error types.
//!
//! Two families, kept apart:
//!
//! - [`ApiError`] is a client mistake. It becomes a 4xx response with a
//!   `{"error": "<message>"}` body and never leaves the request it came from.
//! - [`Error`] is an infrastructure failure (binding the listener, reading the
//!   local address). It is returned to whoever started the server.

use thiserror::Error;

use crate::response::{IntoResponse, Response};
use crate::status::Status;

/// Infrastructure failure surfaced by [`Server`](crate::Server).
#[derive(Debug, Error)]
#[error("io: {0}")]
pub struct Error(#[from] std::io::Error);

/// A rejected request. The `Display` text is the message sent to the client.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ApiError {
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Malformed JSON or an empty `name`.
    #[error("invalid input")]
    InvalidInput,
    /// The `/item/` path segment is not an integer.
    #[error("invalid id")]
    InvalidId,
    /// Unknown path, or a well-formed id with no matching recipe.
    #[error("not found")]
    NotFound,
}

impl ApiError {
    pub fn status(self) -> Status {
        match self {
            Self::MethodNotAllowed => Status::MethodNotAllowed,
            Self::InvalidInput | Self::InvalidId => Status::BadRequest,
            Self::NotFound => Status::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Response::error(self.status(), &self.to_string())
    }
}
