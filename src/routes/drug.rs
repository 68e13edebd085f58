//! Drug CRUD routes.

use crate::handlers::drug::{categories, create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn drug_routes(state: AppState) -> Router {
    Router::new()
        .route("/drugs", get(list).post(create))
        .route("/drugs/:id", get(read).put(update).delete(delete))
        .route("/categories", get(categories))
        .with_state(state)
}
