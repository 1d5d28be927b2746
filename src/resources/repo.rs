use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::resources::repo_types::{Resource, ResourceRegistration, SeatClaim};

#[async_trait]
pub trait ResourceRepo: Send + Sync {
    /// Active resources by start time, unscheduled ones last.
    async fn list_active(&self) -> anyhow::Result<Vec<Resource>>;
    async fn list_upcoming(&self, now: OffsetDateTime) -> anyhow::Result<Vec<Resource>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resource>>;
    async fn find_active_registration(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> anyhow::Result<Option<ResourceRegistration>>;
    /// Every registration of the user, newest first.
    async fn list_registrations(&self, user_id: Uuid) -> anyhow::Result<Vec<ResourceRegistration>>;
    /// Increments the participant count only while below max, then inserts the
    /// registration. Both writes commit together or not at all.
    async fn claim_seat(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<SeatClaim>;
    /// Cancels the active registration and decrements the count, floored at zero.
    /// Returns `None` when there was nothing to cancel.
    async fn release_seat(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<ResourceRegistration>>;
}

const RESOURCE_COLUMNS: &str = "id, title, description, category, resource_type, location, \
     organizer, contact_info, website, start_time, end_time, registration_deadline, \
     is_recurring, recurring_pattern, max_participants, current_participants, is_free, \
     price, tags, difficulty, target_audience, is_active, average_rating, total_reviews, \
     created_at, updated_at";

const REGISTRATION_COLUMNS: &str =
    "id, user_id, resource_id, status, notes, registered_at, updated_at";

#[derive(Clone)]
pub struct PgResourceRepo {
    db: PgPool,
}

impl PgResourceRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResourceRepo for PgResourceRepo {
    async fn list_active(&self) -> anyhow::Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, Resource>(&format!(
            r#"
            SELECT {RESOURCE_COLUMNS}
              FROM resources
             WHERE is_active
             ORDER BY start_time ASC NULLS LAST, title ASC
            "#
        ))
        .fetch_all(&self.db)
        .await
        .context("list active resources")?;
        Ok(rows)
    }

    async fn list_upcoming(&self, now: OffsetDateTime) -> anyhow::Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, Resource>(&format!(
            r#"
            SELECT {RESOURCE_COLUMNS}
              FROM resources
             WHERE is_active AND start_time >= $1
             ORDER BY start_time ASC
            "#
        ))
        .bind(now)
        .fetch_all(&self.db)
        .await
        .context("list upcoming resources")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resource>> {
        let row = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find resource by id")?;
        Ok(row)
    }

    async fn find_active_registration(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
    ) -> anyhow::Result<Option<ResourceRegistration>> {
        let row = sqlx::query_as::<_, ResourceRegistration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
              FROM resource_registrations
             WHERE user_id = $1 AND resource_id = $2 AND status = 'registered'
            "#
        ))
        .bind(user_id)
        .bind(resource_id)
        .fetch_optional(&self.db)
        .await
        .context("find active registration")?;
        Ok(row)
    }

    async fn list_registrations(&self, user_id: Uuid) -> anyhow::Result<Vec<ResourceRegistration>> {
        let rows = sqlx::query_as::<_, ResourceRegistration>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
              FROM resource_registrations
             WHERE user_id = $1
             ORDER BY registered_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list registrations by user")?;
        Ok(rows)
    }

    async fn claim_seat(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<SeatClaim> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let claimed = sqlx::query(
            r#"
            UPDATE resources
               SET current_participants = current_participants + 1,
                   updated_at = $2
             WHERE id = $1
               AND is_active
               AND current_participants < max_participants
               AND (registration_deadline IS NULL OR registration_deadline >= $2)
            "#,
        )
        .bind(resource_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("claim resource seat")?;

        if claimed.rows_affected() == 0 {
            tx.rollback().await.context("rollback tx")?;
            return Ok(SeatClaim::Unavailable);
        }

        let registration = sqlx::query_as::<_, ResourceRegistration>(&format!(
            r#"
            INSERT INTO resource_registrations
                   (id, user_id, resource_id, status, registered_at, updated_at)
            VALUES ($1, $2, $3, 'registered', $4, $4)
            ON CONFLICT (user_id, resource_id) WHERE status = 'registered' DO NOTHING
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(resource_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .context("insert registration")?;

        match registration {
            Some(reg) => {
                tx.commit().await.context("commit tx")?;
                Ok(SeatClaim::Claimed(reg))
            }
            None => {
                tx.rollback().await.context("rollback tx")?;
                Ok(SeatClaim::AlreadyRegistered)
            }
        }
    }

    async fn release_seat(
        &self,
        user_id: Uuid,
        resource_id: Uuid,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<ResourceRegistration>> {
        let mut tx = self.db.begin().await.context("begin tx")?;

        let cancelled = sqlx::query_as::<_, ResourceRegistration>(&format!(
            r#"
            UPDATE resource_registrations
               SET status = 'cancelled', updated_at = $3
             WHERE user_id = $1 AND resource_id = $2 AND status = 'registered'
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(resource_id)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await
        .context("cancel registration")?;

        let Some(cancelled) = cancelled else {
            tx.rollback().await.context("rollback tx")?;
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE resources
               SET current_participants = GREATEST(current_participants - 1, 0),
                   updated_at = $2
             WHERE id = $1
            "#,
        )
        .bind(resource_id)
        .bind(now)
        .execute(&mut *tx)
        .await
        .context("release resource seat")?;

        tx.commit().await.context("commit tx")?;
        Ok(Some(cancelled))
    }
}
