use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

pub mod movies;
pub mod page;
pub mod recommendations;
mod state;

pub use state::{AppState, SharedState};

/// Creates the application router with all routes
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            // Outermost first: the request id must exist before the trace span opens
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/movies", get(movies::list))
        .route(
            "/recommendations",
            get(recommendations::recommend_query).post(recommendations::recommend),
        )
}

/// Health check endpoint
async fn health_check(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    let catalog = state.catalog();
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "movies": catalog.movies().len(),
            "loaded_at": catalog.loaded_at().to_rfc3339(),
        })),
    )
}
