use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    state::AppState,
    tasks::{
        dto::{CreateTaskRequest, UpdateTaskRequest},
        repo_types::Task,
        services,
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Task>>> {
    Ok(Json(services::list(&state, user.id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Task>> {
    let Path(id) = id?;
    Ok(Json(services::get_owned(&state, user.id, id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let Json(body) = body?;
    Ok(Json(services::create(&state, user.id, body).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> AppResult<Json<Task>> {
    let (Path(id), Json(body)) = (id?, body?);
    Ok(Json(services::update(&state, user.id, id, body).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = id?;
    services::delete(&state, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
