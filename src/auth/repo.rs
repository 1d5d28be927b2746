use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{AuthToken, NewUser, ProfileUpdate, User};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Inserts the user, or returns `None` when the email is already taken.
    async fn insert(&self, new: NewUser) -> anyhow::Result<Option<User>>;
    async fn update_profile(&self, id: Uuid, patch: ProfileUpdate) -> anyhow::Result<Option<User>>;
}

#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Stores `token` as the only live session of `user_id`, dropping any previous one.
    async fn replace_session(
        &self,
        user_id: Uuid,
        token: &str,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<AuthToken>;
    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<AuthToken>>;
}

const USER_COLUMNS: &str = "id, email, name, password_hash, productivity_preference, \
     onboarding_completed, workload, weekly_goal, created_at";

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn insert(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, productivity_preference)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .bind(&new.productivity_preference)
        .fetch_optional(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, patch: ProfileUpdate) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   productivity_preference = COALESCE($3, productivity_preference),
                   onboarding_completed = COALESCE($4, onboarding_completed),
                   workload = COALESCE($5, workload),
                   weekly_goal = COALESCE($6, weekly_goal)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.productivity_preference)
        .bind(patch.onboarding_completed)
        .bind(patch.workload)
        .bind(patch.weekly_goal)
        .fetch_optional(&self.db)
        .await
        .context("update user profile")?;
        Ok(user)
    }
}

#[derive(Clone)]
pub struct PgSessionRepo {
    db: PgPool,
}

impl PgSessionRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionRepo for PgSessionRepo {
    async fn replace_session(
        &self,
        user_id: Uuid,
        token: &str,
        created_at: OffsetDateTime,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<AuthToken> {
        let row = sqlx::query_as::<_, AuthToken>(
            r#"
            INSERT INTO auth_tokens (id, user_id, token, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
               SET id = EXCLUDED.id,
                   token = EXCLUDED.token,
                   created_at = EXCLUDED.created_at,
                   expires_at = EXCLUDED.expires_at
            RETURNING id, user_id, token, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(token)
        .bind(created_at)
        .bind(expires_at)
        .fetch_one(&self.db)
        .await
        .context("replace session")?;
        Ok(row)
    }

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<AuthToken>> {
        let row = sqlx::query_as::<_, AuthToken>(
            r#"
            SELECT id, user_id, token, created_at, expires_at
              FROM auth_tokens
             WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .context("find session by token")?;
        Ok(row)
    }
}
