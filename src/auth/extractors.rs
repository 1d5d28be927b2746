use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::{repo_types::User, services::require_user};
use crate::{error::AppError, state::AppState};

/// Header carrying the opaque session token.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Resolves the `X-Auth-Token` header to the calling user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // absent and empty headers are both reported as a missing token
        let token = parts
            .headers
            .get(AUTH_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();

        let user = require_user(state, token).await?;
        Ok(AuthUser(user))
    }
}
