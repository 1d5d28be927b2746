use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::resources::{
    dto::ResourceFilter,
    repo_types::{Resource, ResourceRegistration, SeatClaim},
};
use crate::state::AppState;

pub const CATEGORIES: [&str; 5] = ["workshop", "counseling", "career", "study", "wellness"];
pub const TYPES: [&str; 4] = ["event", "service", "tool", "article"];

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Already registered for this resource")]
    AlreadyRegistered,
    #[error("Resource not found or not available")]
    ResourceUnavailable,
    #[error("Registration deadline has passed")]
    DeadlinePassed,
    #[error("Resource is at full capacity")]
    CapacityExceeded,
    #[error("Registration not found")]
    RegistrationNotFound,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<RegistrationError> for AppError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::AlreadyRegistered | RegistrationError::CapacityExceeded => {
                AppError::Conflict(e.to_string())
            }
            RegistrationError::ResourceUnavailable | RegistrationError::RegistrationNotFound => {
                AppError::NotFound(e.to_string())
            }
            RegistrationError::DeadlinePassed => AppError::Validation(e.to_string()),
            RegistrationError::Store(inner) => AppError::Internal(inner),
        }
    }
}

pub async fn list(state: &AppState, filter: &ResourceFilter) -> AppResult<Vec<Resource>> {
    let all = state.resources.list_active().await?;
    Ok(all.into_iter().filter(|r| filter.matches(r)).collect())
}

pub async fn upcoming(state: &AppState, now: OffsetDateTime) -> AppResult<Vec<Resource>> {
    Ok(state.resources.list_upcoming(now).await?)
}

/// Inactive resources are hidden the same way missing ones are.
pub async fn get(state: &AppState, id: Uuid) -> AppResult<Resource> {
    match state.resources.find_by_id(id).await? {
        Some(r) if r.is_active => Ok(r),
        _ => Err(AppError::NotFound("Resource not found".into())),
    }
}

pub fn categories() -> &'static [&'static str] {
    &CATEGORIES
}

pub fn types() -> &'static [&'static str] {
    &TYPES
}

pub async fn registrations(state: &AppState, user_id: Uuid) -> AppResult<Vec<ResourceRegistration>> {
    Ok(state.resources.list_registrations(user_id).await?)
}

pub async fn is_registered(state: &AppState, user_id: Uuid, resource_id: Uuid) -> AppResult<bool> {
    Ok(state
        .resources
        .find_active_registration(user_id, resource_id)
        .await?
        .is_some())
}

pub async fn register(
    state: &AppState,
    user_id: Uuid,
    resource_id: Uuid,
    now: OffsetDateTime,
) -> Result<ResourceRegistration, RegistrationError> {
    let repo = &state.resources;

    if repo
        .find_active_registration(user_id, resource_id)
        .await?
        .is_some()
    {
        return Err(RegistrationError::AlreadyRegistered);
    }

    let resource = match repo.find_by_id(resource_id).await? {
        Some(r) if r.is_active => r,
        _ => return Err(RegistrationError::ResourceUnavailable),
    };
    if resource.deadline_passed(now) {
        return Err(RegistrationError::DeadlinePassed);
    }
    if !resource.has_capacity() {
        return Err(RegistrationError::CapacityExceeded);
    }

    match repo.claim_seat(user_id, resource_id, now).await? {
        SeatClaim::Claimed(reg) => {
            info!(%user_id, %resource_id, registration_id = %reg.id, "registered for resource");
            Ok(reg)
        }
        SeatClaim::AlreadyRegistered => Err(RegistrationError::AlreadyRegistered),
        SeatClaim::Unavailable => {
            warn!(%user_id, %resource_id, "seat claim lost to a concurrent registration");
            Err(RegistrationError::CapacityExceeded)
        }
    }
}

pub async fn cancel(
    state: &AppState,
    user_id: Uuid,
    resource_id: Uuid,
    now: OffsetDateTime,
) -> Result<ResourceRegistration, RegistrationError> {
    let cancelled = state
        .resources
        .release_seat(user_id, resource_id, now)
        .await?
        .ok_or(RegistrationError::RegistrationNotFound)?;
    info!(%user_id, %resource_id, "registration cancelled");
    Ok(cancelled)
}
