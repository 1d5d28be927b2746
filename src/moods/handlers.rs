use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    moods::{
        dto::{CreateMoodRequest, RangeQuery},
        repo_types::MoodLog,
        services,
    },
    state::AppState,
};

pub fn mood_routes() -> Router<AppState> {
    Router::new()
        .route("/moods", post(create_mood))
        .route("/moods/latest", get(latest_moods))
        .route("/moods/range", get(mood_range))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_mood(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<CreateMoodRequest>, JsonRejection>,
) -> AppResult<Json<MoodLog>> {
    let Json(body) = body?;
    Ok(Json(services::create(&state, user.id, body).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn latest_moods(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<MoodLog>>> {
    Ok(Json(services::latest(&state, user.id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn mood_range(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    q: Result<Query<RangeQuery>, QueryRejection>,
) -> AppResult<Json<Vec<MoodLog>>> {
    let Query(q) = q?;
    Ok(Json(services::range(&state, user.id, q.start, q.end).await?))
}
