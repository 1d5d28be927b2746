use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::tasks::repo_types::{NewTask, Task, TaskPatch};

#[async_trait]
pub trait TaskRepo: Send + Sync {
    /// All tasks of a user, earliest due date first, undated tasks last.
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Task>>;
    /// Tasks due within `start..=end`.
    async fn list_due_between(&self, user_id: Uuid, start: Date, end: Date) -> anyhow::Result<Vec<Task>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Task>>;
    async fn insert(&self, new: NewTask) -> anyhow::Result<Task>;
    async fn update(&self, id: Uuid, patch: TaskPatch, now: OffsetDateTime) -> anyhow::Result<Option<Task>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

const TASK_COLUMNS: &str = "id, user_id, title, description, due_date, status, \
     estimated_minutes, difficulty, course, created_at, updated_at";

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn list_by_user(&self, user_id: Uuid) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
              FROM tasks
             WHERE user_id = $1
             ORDER BY due_date ASC NULLS LAST, created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list tasks by user")?;
        Ok(rows)
    }

    async fn list_due_between(&self, user_id: Uuid, start: Date, end: Date) -> anyhow::Result<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
              FROM tasks
             WHERE user_id = $1 AND due_date BETWEEN $2 AND $3
             ORDER BY due_date ASC, created_at ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list tasks due between")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find task by id")?;
        Ok(row)
    }

    async fn insert(&self, new: NewTask) -> anyhow::Result<Task> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (id, user_id, title, description, due_date, status,
                               estimated_minutes, difficulty, course, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'TODO', $6, $7, $8, $9, $9)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.due_date)
        .bind(new.estimated_minutes)
        .bind(new.difficulty)
        .bind(&new.course)
        .bind(new.created_at)
        .fetch_one(&self.db)
        .await
        .context("insert task")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: TaskPatch, now: OffsetDateTime) -> anyhow::Result<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   due_date = COALESCE($4, due_date),
                   estimated_minutes = COALESCE($5, estimated_minutes),
                   difficulty = COALESCE($6, difficulty),
                   course = COALESCE($7, course),
                   status = COALESCE($8, status),
                   updated_at = $9
             WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.due_date)
        .bind(patch.estimated_minutes)
        .bind(patch.difficulty)
        .bind(patch.course)
        .bind(patch.status)
        .bind(now)
        .fetch_optional(&self.db)
        .await
        .context("update task")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete task")?;
        Ok(res.rows_affected() > 0)
    }
}
