//! Stateful handlers and their type erasure.
//!
//! A route handler is an async function of the shared state and the request:
//!
//! ```text
//! async fn add_recipe<S: RecipeStore>(store: Arc<S>, req: Request) -> impl IntoResponse
//! ```
//!
//! Every endpoint has its own concrete function type, so the router keeps them
//! as `Arc<dyn ErasedHandler<S>>` and passes its `Arc<S>` in on each call.
//! Per request that is two `Arc` clones (state and handler) and one virtual
//! call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A boxed future resolving to a [`Response`]. `Send + 'static` so hyper can
/// drive it on any worker thread.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Object-safe form of [`Handler`]. `#[doc(hidden)] pub` because it appears in
/// the signature of [`Handler::into_boxed_handler`].
#[doc(hidden)]
pub trait ErasedHandler<S>: Send + Sync {
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture;
}

#[doc(hidden)]
pub type BoxedHandler<S> = Arc<dyn ErasedHandler<S>>;

/// Implemented for every
/// `Fn(Arc<S>, Request) -> impl Future<Output = impl IntoResponse>`.
///
/// Sealed: the blanket impl is the only implementation.
pub trait Handler<S>: private::Sealed<S> + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler<S>;
}

mod private {
    pub trait Sealed<S> {}
}

impl<S, F, Fut, R> private::Sealed<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
}

impl<S, F, Fut, R> Handler<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn into_boxed_handler(self) -> BoxedHandler<S> {
        Arc::new(StateFn(self))
    }
}

/// Holds the concrete function; converts its output on the way out.
struct StateFn<F>(F);

impl<S, F, Fut, R> ErasedHandler<S> for StateFn<F>
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture {
        let fut = (self.0)(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}
