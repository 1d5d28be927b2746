use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::tasks::{
    dto::{CreateTaskRequest, UpdateTaskRequest},
    repo_types::{NewTask, Task, TaskPatch},
};

pub async fn list(state: &AppState, user_id: Uuid) -> AppResult<Vec<Task>> {
    Ok(state.tasks.list_by_user(user_id).await?)
}

/// Loads a task and checks that `user_id` owns it.
pub async fn get_owned(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<Task> {
    let task = state
        .tasks
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    if task.user_id != user_id {
        warn!(%user_id, task_id = %id, "task owned by another user");
        return Err(AppError::Forbidden("Forbidden".into()));
    }
    Ok(task)
}

pub async fn create(state: &AppState, user_id: Uuid, req: CreateTaskRequest) -> AppResult<Task> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    let task = state
        .tasks
        .insert(NewTask {
            user_id,
            title: title.to_owned(),
            description: req.description,
            due_date: req.due_date,
            estimated_minutes: req.estimated_minutes,
            difficulty: req.difficulty,
            course: req.course,
            created_at: OffsetDateTime::now_utc(),
        })
        .await?;
    info!(%user_id, task_id = %task.id, "task created");
    Ok(task)
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateTaskRequest,
) -> AppResult<Task> {
    get_owned(state, user_id, id).await?;

    let title = match req.title {
        Some(t) if t.trim().is_empty() => {
            return Err(AppError::Validation("Title must not be blank".into()))
        }
        Some(t) => Some(t.trim().to_owned()),
        None => None,
    };
    let patch = TaskPatch {
        title,
        description: req.description,
        due_date: req.due_date,
        estimated_minutes: req.estimated_minutes,
        difficulty: req.difficulty,
        course: req.course,
        status: req.status,
    };
    let task = state
        .tasks
        .update(id, patch, OffsetDateTime::now_utc())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;
    info!(%user_id, task_id = %id, status = ?task.status, "task updated");
    Ok(task)
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    get_owned(state, user_id, id).await?;
    if !state.tasks.delete(id).await? {
        return Err(AppError::NotFound("Task not found".into()));
    }
    info!(%user_id, task_id = %id, "task deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::repo_types::TaskStatus;
    use time::macros::date;

    fn request(title: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            title: title.into(),
            description: None,
            due_date: Some(date!(2024 - 05 - 01)),
            estimated_minutes: Some(45),
            difficulty: Some(2),
            course: Some("CS101".into()),
        }
    }

    #[tokio::test]
    async fn create_starts_as_todo() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let task = create(&state, user, request("  Read chapter 3 ")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.title, "Read chapter 3");
        assert_eq!(task.user_id, user);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn create_requires_title() {
        let state = AppState::fake();
        let err = create(&state, Uuid::new_v4(), request("   ")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn list_is_scoped_and_ordered_by_due_date() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let mut later = request("later");
        later.due_date = Some(date!(2024 - 06 - 01));
        let mut undated = request("undated");
        undated.due_date = None;
        create(&state, user, later).await.unwrap();
        create(&state, user, undated).await.unwrap();
        create(&state, user, request("sooner")).await.unwrap();
        create(&state, Uuid::new_v4(), request("someone else")).await.unwrap();

        let titles: Vec<_> = list(&state, user).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["sooner", "later", "undated"]);
    }

    #[tokio::test]
    async fn update_applies_partial_patch() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let task = create(&state, user, request("Essay")).await.unwrap();

        let updated = update(
            &state,
            user,
            task.id,
            UpdateTaskRequest {
                status: Some(TaskStatus::Done),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Essay");
        assert_eq!(updated.course.as_deref(), Some("CS101"));
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn other_users_cannot_touch_a_task() {
        let state = AppState::fake();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let task = create(&state, owner, request("Private")).await.unwrap();

        let err = update(&state, intruder, task.id, UpdateTaskRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        let err = delete(&state, intruder, task.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        assert!(get_owned(&state, owner, task.id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_removes_task() {
        let state = AppState::fake();
        let user = Uuid::new_v4();
        let task = create(&state, user, request("Done soon")).await.unwrap();
        delete(&state, user, task.id).await.unwrap();
        let err = get_owned(&state, user, task.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
