use axum::{extract::State, Json};

use crate::{models::Movie, routes::SharedState};

/// Every movie in table order, for populating the selector
pub async fn list(State(state): State<SharedState>) -> Json<Vec<Movie>> {
    Json(state.catalog().movies().as_slice().to_vec())
}
