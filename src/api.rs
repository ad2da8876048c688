//! The four recipe endpoints.
//!
//! | Route | Method | Result |
//! |---|---|---|
//! | `/list` | GET | every recipe, in insertion order |
//! | `/add` | POST | the stored recipe, with its assigned id |
//! | `/item/{id}` | GET | one recipe |
//! | `/stats` | GET | `{"total": n, "cooked": m}` |
//!
//! Handlers are generic over [`RecipeStore`], so the same routes run against
//! [`MemoryStore`](crate::MemoryStore) in production and against test doubles.

use std::sync::Arc;

use tracing::debug;

use crate::error::ApiError;
use crate::method::Method;
use crate::recipe::{NewRecipe, Recipe, Stats};
use crate::request::Request;
use crate::response::Json;
use crate::router::Router;
use crate::store::RecipeStore;

/// Builds the recipe API on top of `store`.
pub fn router<S: RecipeStore>(store: Arc<S>) -> Router<S> {
    Router::new(store)
        .on(Method::Get,  "/list",        list_recipes::<S>)
        .on(Method::Post, "/add",         add_recipe::<S>)
        .on(Method::Get,  "/item/",       get_recipe::<S>)
        .on(Method::Get,  "/item/{*id}",  get_recipe::<S>)
        .on(Method::Get,  "/stats",       recipe_stats::<S>)
}

async fn list_recipes<S: RecipeStore>(store: Arc<S>, _req: Request) -> Json<Vec<Recipe>> {
    Json(store.list())
}

async fn add_recipe<S: RecipeStore>(
    store: Arc<S>,
    req: Request,
) -> Result<Json<Recipe>, ApiError> {
    let candidate: NewRecipe = req.json().map_err(|e| {
        debug!("rejecting recipe payload: {e}");
        ApiError::InvalidInput
    })?;
    if candidate.name.is_empty() {
        return Err(ApiError::InvalidInput);
    }

    Ok(Json(store.add(candidate)))
}

async fn get_recipe<S: RecipeStore>(
    store: Arc<S>,
    req: Request,
) -> Result<Json<Recipe>, ApiError> {
    let id = parse_id(req.param("id").unwrap_or_default())?;

    // Negative ids are well-formed but can never match.
    u64::try_from(id)
        .ok()
        .and_then(|id| store.get(id))
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn recipe_stats<S: RecipeStore>(store: Arc<S>, _req: Request) -> Json<Stats> {
    Json(Stats::from_recipes(&store.list()))
}

fn parse_id(segment: &str) -> Result<i64, ApiError> {
    segment.parse().map_err(|_| ApiError::InvalidId)
}
