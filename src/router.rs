//! Radix-tree request router.
//!
//! Paths live in one [`matchit`] tree; each path node owns a small
//! method → handler table. That split lets the router answer the two misses
//! differently: an unknown path is `404`, a known path hit with the wrong
//! method is `405`.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::error::ApiError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The application router, owning the state every handler receives.
///
/// Build it once at startup and hand it to
/// [`Server::serve`](crate::Server::serve).
pub struct Router<S> {
    state: Arc<S>,
    tree: MatchitRouter<usize>,
    endpoints: Vec<HashMap<Method, BoxedHandler<S>>>,
    paths: HashMap<String, usize>,
}

pub(crate) enum Route<S> {
    Matched(BoxedHandler<S>, Method, HashMap<String, String>),
    MethodNotAllowed,
    NotFound,
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new(state: Arc<S>) -> Self {
        Self {
            state,
            tree: MatchitRouter::new(),
            endpoints: Vec::new(),
            paths: HashMap::new(),
        }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Paths use `matchit` syntax: `{name}` for a segment, `{*name}` for the
    /// remainder of the path.
    ///
    /// # Panics
    ///
    /// Panics if `path` is malformed or conflicts with an existing route.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        let slot = match self.paths.get(path) {
            Some(&slot) => slot,
            None => {
                let slot = self.endpoints.len();
                self.tree
                    .insert(path, slot)
                    .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
                self.endpoints.push(HashMap::new());
                self.paths.insert(path.to_owned(), slot);
                slot
            }
        };
        self.endpoints[slot].insert(method, handler.into_boxed_handler());
        self
    }

    pub(crate) fn lookup(&self, method: &str, path: &str) -> Route<S> {
        let Ok(matched) = self.tree.at(path) else {
            return Route::NotFound;
        };
        let handlers = &self.endpoints[*matched.value];
        let Some((method, handler)) = method
            .parse::<Method>()
            .ok()
            .and_then(|m| handlers.get(&m).map(|h| (m, h)))
        else {
            return Route::MethodNotAllowed;
        };

        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Route::Matched(Arc::clone(handler), method, params)
    }

    /// Routes one request and produces its response.
    ///
    /// `method` is the wire method string; unrecognised methods are treated
    /// like any other method the path does not accept. `path` is the raw
    /// request path and is percent-decoded before matching.
    pub async fn respond(&self, method: &str, path: &str, body: Bytes) -> Response {
        let path = decode_path(path);
        match self.lookup(method, &path) {
            Route::Matched(handler, method, params) => {
                let req = Request::new(method, path, body, params);
                handler.call(Arc::clone(&self.state), req).await
            }
            Route::MethodNotAllowed => ApiError::MethodNotAllowed.into_response(),
            Route::NotFound => ApiError::NotFound.into_response(),
        }
    }
}

/// Percent-decodes a request path. Invalid UTF-8 after decoding is replaced
/// with U+FFFD, which then fails to match or parse downstream.
fn decode_path(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Json;

    async fn echo_param(_: Arc<()>, req: Request) -> Json<String> {
        Json(req.param("rest").unwrap_or_default().to_owned())
    }

    async fn method_name(_: Arc<()>, req: Request) -> Json<&'static str> {
        Json(req.method().as_str())
    }

    async fn read_state(state: Arc<String>, _req: Request) -> Json<String> {
        Json(state.as_str().to_owned())
    }

    fn app() -> Router<()> {
        Router::new(Arc::new(()))
            .on(Method::Get, "/thing", method_name)
            .on(Method::Put, "/thing", method_name)
            .on(Method::Get, "/tail/", echo_param)
            .on(Method::Get, "/tail/{*rest}", echo_param)
    }

    #[tokio::test]
    async fn dispatches_by_method_on_shared_path() {
        let app = app();
        assert_eq!(app.respond("GET", "/thing", Bytes::new()).await.body(), br#""GET""#);
        assert_eq!(app.respond("PUT", "/thing", Bytes::new()).await.body(), br#""PUT""#);
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let app = app();
        for method in ["POST", "HEAD", "BREW"] {
            let response = app.respond(method, "/thing", Bytes::new()).await;
            assert_eq!(response.status_code(), 405);
            assert_eq!(response.body(), br#"{"error":"method not allowed"}"#);
        }
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let response = app().respond("GET", "/nope", Bytes::new()).await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.body(), br#"{"error":"not found"}"#);
    }

    #[tokio::test]
    async fn catch_all_captures_remainder() {
        let app = app();
        assert_eq!(app.respond("GET", "/tail/a/b", Bytes::new()).await.body(), br#""a/b""#);
        assert_eq!(app.respond("GET", "/tail/", Bytes::new()).await.body(), br#""""#);
    }

    #[tokio::test]
    async fn paths_are_percent_decoded_before_matching() {
        let app = app();
        assert_eq!(app.respond("GET", "/th%69ng", Bytes::new()).await.body(), br#""GET""#);
        assert_eq!(app.respond("GET", "/tail/a%20b", Bytes::new()).await.body(), br#""a b""#);
    }

    #[tokio::test]
    async fn handlers_receive_router_state() {
        let app = Router::new(Arc::new("pantry".to_owned())).on(Method::Get, "/", read_state);
        assert_eq!(app.respond("GET", "/", Bytes::new()).await.body(), br#""pantry""#);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new(Arc::new(()))
            .on(Method::Get, "/x/{a}", method_name)
            .on(Method::Get, "/x/{b}", method_name);
    }
}
