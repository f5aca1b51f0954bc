use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{RecommendationRequest, RecommendationResponse, RecommendedMovie},
    routes::AppState,
    routes::SharedState,
};

/// Handler for `GET /recommendations?title=..&k=..`
pub async fn recommend_query(
    State(state): State<SharedState>,
    Extension(request_id): Extension<RequestId>,
    Query(request): Query<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    recommend_with_posters(&state, request_id, request).await.map(Json)
}

/// Handler for `POST /recommendations`
pub async fn recommend(
    State(state): State<SharedState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    recommend_with_posters(&state, request_id, request).await.map(Json)
}

async fn recommend_with_posters(
    state: &AppState,
    request_id: RequestId,
    request: RecommendationRequest,
) -> AppResult<RecommendationResponse> {
    let k = state.recommender.resolve_k(request.k)?;

    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        k,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend_k(&request.title, k)?;

    let movie_ids: Vec<i64> = recommendations.iter().map(|r| r.movie_id).collect();
    let posters = state.posters.poster_urls(&movie_ids).await;

    let recommendations: Vec<RecommendedMovie> = recommendations
        .into_iter()
        .zip(posters)
        .map(|(rec, poster_url)| RecommendedMovie::new(rec, poster_url))
        .collect();

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        poster_provider = state.posters.provider_name(),
        "Recommendations completed"
    );

    Ok(RecommendationResponse {
        query: request.title,
        recommendations,
    })
}
