//! # recipebox
//!
//! A small in-memory recipe catalog served over HTTP/JSON.
//!
//! ## Routes
//!
//! - `GET /list`: every recipe, in the order they were added
//! - `POST /add`: store `{"name": "...", "cooked": false}`, get it back with an id
//! - `GET /item/{id}`: one recipe
//! - `GET /stats`: `{"total": n, "cooked": m}`
//!
//! Every response is JSON. Errors use `{"error": "<message>"}`.
//!
//! ## Pieces
//!
//! - [`MemoryStore`]: the catalog. Multiple readers, one writer, ids from 1.
//! - [`api::router`]: the four endpoints over any [`RecipeStore`].
//! - [`Router`] / [`Server`]: radix-tree routing via [`matchit`], hyper
//!   connections on tokio, graceful shutdown on SIGTERM / Ctrl-C.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use recipebox::{MemoryStore, Server, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), recipebox::Error> {
//!     let app = api::router(Arc::new(MemoryStore::new()));
//!     Server::bind("0.0.0.0:8080".parse().unwrap()).await?.serve(app).await;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod recipe;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub mod api;

pub use config::Config;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use recipe::{NewRecipe, Recipe, Stats};
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::{MemoryStore, RecipeStore};
