use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, UpdateProfileRequest},
        extractors::AuthUser,
        repo_types::ProfileUpdate,
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_me).patch(update_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<PublicUser>> {
    let Json(payload) = payload?;
    let user = services::register(&state, &payload.email, &payload.name, &payload.password).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let (token, user) = services::login(&state, &payload.email, &payload.password).await?;
    Ok(Json(LoginResponse {
        token: token.token,
        user_id: user.id,
        email: user.email,
        name: user.name,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<PublicUser>> {
    let Json(payload) = payload?;
    let patch = ProfileUpdate {
        name: payload.name,
        productivity_preference: payload.productivity_preference,
        onboarding_completed: payload.onboarding_completed,
        workload: payload.workload,
        weekly_goal: payload.weekly_goal,
    };
    let updated = services::update_profile(&state, &user, patch).await?;
    Ok(Json(updated.into()))
}
