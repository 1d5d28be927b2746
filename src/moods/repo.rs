use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::moods::repo_types::{MoodLog, NewMoodLog};

#[async_trait]
pub trait MoodRepo: Send + Sync {
    async fn insert(&self, new: NewMoodLog) -> anyhow::Result<MoodLog>;
    /// Newest date first.
    async fn latest(&self, user_id: Uuid) -> anyhow::Result<Vec<MoodLog>>;
    /// Entries within `start..=end`, oldest first, so the last entry of a day is its latest.
    async fn range(&self, user_id: Uuid, start: Date, end: Date) -> anyhow::Result<Vec<MoodLog>>;
}

#[derive(Clone)]
pub struct PgMoodRepo {
    db: PgPool,
}

impl PgMoodRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MoodRepo for PgMoodRepo {
    async fn insert(&self, new: NewMoodLog) -> anyhow::Result<MoodLog> {
        let row = sqlx::query_as::<_, MoodLog>(
            r#"
            INSERT INTO mood_logs (id, user_id, date, mood, stress, note, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, date, mood, stress, note, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.date)
        .bind(new.mood)
        .bind(new.stress)
        .bind(&new.note)
        .bind(new.created_at)
        .fetch_one(&self.db)
        .await
        .context("insert mood log")?;
        Ok(row)
    }

    async fn latest(&self, user_id: Uuid) -> anyhow::Result<Vec<MoodLog>> {
        let rows = sqlx::query_as::<_, MoodLog>(
            r#"
            SELECT id, user_id, date, mood, stress, note, created_at
              FROM mood_logs
             WHERE user_id = $1
             ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list latest mood logs")?;
        Ok(rows)
    }

    async fn range(&self, user_id: Uuid, start: Date, end: Date) -> anyhow::Result<Vec<MoodLog>> {
        let rows = sqlx::query_as::<_, MoodLog>(
            r#"
            SELECT id, user_id, date, mood, stress, note, created_at
              FROM mood_logs
             WHERE user_id = $1 AND date BETWEEN $2 AND $3
             ORDER BY date ASC, created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list mood logs in range")?;
        Ok(rows)
    }
}
