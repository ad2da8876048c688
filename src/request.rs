//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::{DeserializeOwned, Error as _};

use crate::method::Method;

/// A routed request: method, path, the fully-read body and any path
/// parameters the matched route captured.
pub struct Request {
    method: Method,
    path: String,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path: path.into(), body, params }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Returns a named path parameter.
    ///
    /// For a route `/item/{*id}`, `req.param("id")` on `/item/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the first JSON value in the body. Bytes after it are ignored;
    /// an empty body is an error.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::Deserializer::from_slice(&self.body)
            .into_iter::<T>()
            .next()
            .unwrap_or_else(|| Err(serde_json::Error::custom("empty request body")))
    }
}
