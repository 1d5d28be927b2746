use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::{AuthToken, NewUser, ProfileUpdate, User};
use crate::error::AppError;
use crate::state::AppState;

const TOKEN_LEN: usize = 48;
const MIN_PASSWORD_LEN: usize = 8;
const DEFAULT_PREFERENCE: &str = "morning";
const PREFERENCES: [&str; 3] = ["morning", "afternoon", "evening"];
const WORKLOADS: [&str; 3] = ["Low", "Medium", "High"];

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::DuplicateEmail => AppError::Conflict(e.to_string()),
            AuthError::Validation(msg) => AppError::Validation(msg),
            AuthError::Store(inner) => AppError::Internal(inner),
            AuthError::InvalidCredentials
            | AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::UserNotFound => AppError::Unauthorized(e.to_string()),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Random alphanumeric bearer token with no embedded structure.
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

pub async fn register(
    state: &AppState,
    email: &str,
    name: &str,
    password: &str,
) -> Result<User, AuthError> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AuthError::Validation("Invalid email".into()));
    }
    if name.trim().is_empty() {
        return Err(AuthError::Validation("Name is required".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation("Password too short".into()));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash_password(password.to_owned()).await?;
    let user = state
        .users
        .insert(NewUser {
            email,
            name: name.trim().to_owned(),
            password_hash,
            productivity_preference: DEFAULT_PREFERENCE.to_owned(),
        })
        .await?
        // lost a race against a concurrent registration
        .ok_or(AuthError::DuplicateEmail)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
) -> Result<(AuthToken, User), AuthError> {
    let email = normalize_email(email);
    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password.to_owned(), user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let now = OffsetDateTime::now_utc();
    let expires_at = now + Duration::days(state.config.session.ttl_days);
    let token = state
        .sessions
        .replace_session(user.id, &generate_token(), now, expires_at)
        .await?;

    info!(user_id = %user.id, session_id = %token.id, email = %user.email, "user logged in");
    Ok((token, user))
}

/// Resolves a bearer token to its user. Every authenticated route goes through here.
pub async fn require_user(state: &AppState, token: &str) -> Result<User, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let session = state
        .sessions
        .find_by_token(token)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    if session.expires_at < OffsetDateTime::now_utc() {
        debug!(user_id = %session.user_id, "token expired");
        return Err(AuthError::TokenExpired);
    }

    state
        .users
        .find_by_id(session.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)
}

pub async fn update_profile(
    state: &AppState,
    user: &User,
    mut patch: ProfileUpdate,
) -> Result<User, AuthError> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(AuthError::Validation("Name must not be blank".into()));
        }
        patch.name = Some(name.trim().to_owned());
    }
    if let Some(pref) = &patch.productivity_preference {
        let pref = pref.trim().to_lowercase();
        if !PREFERENCES.contains(&pref.as_str()) {
            return Err(AuthError::Validation(format!(
                "productivityPreference must be one of {}",
                PREFERENCES.join(", ")
            )));
        }
        patch.productivity_preference = Some(pref);
    }
    if let Some(workload) = &patch.workload {
        if !WORKLOADS.contains(&workload.as_str()) {
            return Err(AuthError::Validation(format!(
                "workload must be one of {}",
                WORKLOADS.join(", ")
            )));
        }
    }

    let updated = state
        .users
        .update_profile(user.id, patch)
        .await?
        .ok_or(AuthError::UserNotFound)?;
    info!(user_id = %updated.id, "profile updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registered(state: &AppState) -> User {
        register(state, "Ada@Example.com", "Ada", "correct-horse")
            .await
            .expect("register")
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("spaces in@b.co"));
    }

    #[test]
    fn tokens_are_opaque_and_random() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn register_lowercases_email_and_sets_defaults() {
        let state = AppState::fake();
        let user = registered(&state).await;
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.productivity_preference.as_deref(), Some("morning"));
        assert!(user.onboarding_completed);
        assert_ne!(user.password_hash, "correct-horse");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_regardless_of_password_or_case() {
        let state = AppState::fake();
        registered(&state).await;
        let err = register(&state, "ADA@example.com", "Other", "another-password")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let state = AppState::fake();
        for (email, name, password) in [
            ("bad-email", "Ada", "long-enough"),
            ("a@b.co", "  ", "long-enough"),
            ("a@b.co", "Ada", "short"),
        ] {
            let err = register(&state, email, name, password).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)), "{email} {name} {password}");
        }
    }

    #[tokio::test]
    async fn login_issues_token_that_resolves_to_user() {
        let state = AppState::fake();
        let user = registered(&state).await;
        let (token, logged_in) = login(&state, "ada@example.com", "correct-horse")
            .await
            .expect("login");
        assert_eq!(logged_in.id, user.id);
        assert_eq!(token.user_id, user.id);
        let days = (token.expires_at - token.created_at).whole_days();
        assert_eq!(days, 30);

        let resolved = require_user(&state, &token.token).await.expect("require_user");
        assert_eq!(resolved.id, user.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials() {
        let state = AppState::fake();
        registered(&state).await;
        let wrong_pw = login(&state, "ada@example.com", "nope-nope").await.unwrap_err();
        assert!(matches!(wrong_pw, AuthError::InvalidCredentials));
        let unknown = login(&state, "bob@example.com", "correct-horse").await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn second_login_invalidates_first_token() {
        let state = AppState::fake();
        registered(&state).await;
        let (first, _) = login(&state, "ada@example.com", "correct-horse").await.unwrap();
        assert!(require_user(&state, &first.token).await.is_ok());

        let (second, _) = login(&state, "ada@example.com", "correct-horse").await.unwrap();
        assert_ne!(first.token, second.token);
        assert_ne!(first.id, second.id);

        let err = require_user(&state, &first.token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
        assert!(require_user(&state, &second.token).await.is_ok());
    }

    #[tokio::test]
    async fn require_user_rejects_missing_unknown_and_expired_tokens() {
        let state = AppState::fake();
        let user = registered(&state).await;

        assert!(matches!(
            require_user(&state, "   ").await.unwrap_err(),
            AuthError::MissingToken
        ));
        assert!(matches!(
            require_user(&state, "does-not-exist").await.unwrap_err(),
            AuthError::InvalidToken
        ));

        let past = OffsetDateTime::now_utc() - Duration::days(31);
        state
            .sessions
            .replace_session(user.id, "stale-token", past, past + Duration::days(30))
            .await
            .unwrap();
        assert!(matches!(
            require_user(&state, "stale-token").await.unwrap_err(),
            AuthError::TokenExpired
        ));
    }

    #[tokio::test]
    async fn update_profile_validates_and_applies_patch() {
        let state = AppState::fake();
        let user = registered(&state).await;

        let err = update_profile(
            &state,
            &user,
            ProfileUpdate {
                productivity_preference: Some("midnight".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let updated = update_profile(
            &state,
            &user,
            ProfileUpdate {
                productivity_preference: Some("Evening".into()),
                workload: Some("High".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.productivity_preference.as_deref(), Some("evening"));
        assert_eq!(updated.workload.as_deref(), Some("High"));
        assert_eq!(updated.name, "Ada");
    }

    #[test]
    fn auth_errors_map_to_http_statuses() {
        use axum::http::StatusCode;
        assert_eq!(AppError::from(AuthError::DuplicateEmail).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(AuthError::Validation("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
