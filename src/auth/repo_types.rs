use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,                           // stored lowercased
    pub name: String,
    pub password_hash: String,                   // Argon2 PHC string
    pub productivity_preference: Option<String>, // morning | afternoon | evening
    pub onboarding_completed: bool,
    pub workload: Option<String>,
    pub weekly_goal: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub productivity_preference: String,
}

/// Partial profile update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub productivity_preference: Option<String>,
    pub onboarding_completed: Option<bool>,
    pub workload: Option<String>,
    pub weekly_goal: Option<String>,
}

/// Opaque bearer token. At most one row per user.
#[derive(Debug, Clone, FromRow)]
pub struct AuthToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}
