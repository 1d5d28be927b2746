use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    resources::{
        dto::{
            CategoriesResponse, MessageResponse, RegisterResponse, RegistrationStatusResponse,
            RegistrationsResponse, ResourceFilter, ResourceListResponse, TypesResponse,
            UpcomingResponse,
        },
        repo_types::Resource,
        services,
    },
    state::AppState,
};

pub fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/resources", get(list_resources))
        .route("/resources/categories", get(list_categories))
        .route("/resources/types", get(list_types))
        .route("/resources/upcoming", get(upcoming_events))
        .route("/resources/registrations", get(my_registrations))
        .route("/resources/:id", get(get_resource))
        .route(
            "/resources/:id/register",
            post(register_for_resource).delete(cancel_registration),
        )
        .route("/resources/:id/registration-status", get(registration_status))
}

#[instrument(skip_all)]
pub async fn list_resources(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    filter: Result<Query<ResourceFilter>, QueryRejection>,
) -> AppResult<Json<ResourceListResponse>> {
    let Query(filter) = filter?;
    let resources = services::list(&state, &filter).await?;
    Ok(Json(ResourceListResponse {
        total: resources.len(),
        resources,
        filters: filter,
    }))
}

pub async fn list_categories(AuthUser(_user): AuthUser) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: services::categories(),
    })
}

pub async fn list_types(AuthUser(_user): AuthUser) -> Json<TypesResponse> {
    Json(TypesResponse {
        types: services::types(),
    })
}

pub async fn upcoming_events(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> AppResult<Json<UpcomingResponse>> {
    let events = services::upcoming(&state, OffsetDateTime::now_utc()).await?;
    Ok(Json(UpcomingResponse {
        total: events.len(),
        events,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn my_registrations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<RegistrationsResponse>> {
    let registrations = services::registrations(&state, user.id).await?;
    Ok(Json(RegistrationsResponse { registrations }))
}

pub async fn get_resource(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<Resource>> {
    let Path(id) = id?;
    Ok(Json(services::get(&state, id).await?))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn register_for_resource(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<RegisterResponse>> {
    let Path(id) = id?;
    let registration = services::register(&state, user.id, id, OffsetDateTime::now_utc()).await?;
    Ok(Json(RegisterResponse {
        message: "Successfully registered for resource",
        registration,
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn cancel_registration(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;
    services::cancel(&state, user.id, id, OffsetDateTime::now_utc()).await?;
    Ok(Json(MessageResponse {
        message: "Registration cancelled successfully",
    }))
}

pub async fn registration_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> AppResult<Json<RegistrationStatusResponse>> {
    let Path(id) = id?;
    let is_registered = services::is_registered(&state, user.id, id).await?;
    Ok(Json(RegistrationStatusResponse { is_registered }))
}
