use serde::Deserialize;
use time::Date;

use crate::dates;
use crate::tasks::repo_types::TaskStatus;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "dates::flexible_date_option::deserialize")]
    pub due_date: Option<Date>,
    pub estimated_minutes: Option<i32>,
    pub difficulty: Option<i32>,
    pub course: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "dates::flexible_date_option::deserialize")]
    pub due_date: Option<Date>,
    pub estimated_minutes: Option<i32>,
    pub difficulty: Option<i32>,
    pub course: Option<String>,
    pub status: Option<TaskStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn create_accepts_date_or_timestamp() {
        let a: CreateTaskRequest =
            serde_json::from_str(r#"{"title":"Essay","dueDate":"2024-05-01"}"#).unwrap();
        assert_eq!(a.due_date, Some(date!(2024 - 05 - 01)));

        let b: CreateTaskRequest =
            serde_json::from_str(r#"{"title":"Essay","dueDate":"2024-05-01T10:00:00Z"}"#).unwrap();
        assert_eq!(b.due_date, Some(date!(2024 - 05 - 01)));

        let c: CreateTaskRequest = serde_json::from_str(r#"{"title":"Essay"}"#).unwrap();
        assert_eq!(c.due_date, None);
    }

    #[test]
    fn update_status_is_case_insensitive() {
        let patch: UpdateTaskRequest = serde_json::from_str(r#"{"status":"done"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::Done));
        let patch: UpdateTaskRequest = serde_json::from_str(r#"{"status":"in progress"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
        assert!(serde_json::from_str::<UpdateTaskRequest>(r#"{"status":"archived"}"#).is_err());
    }
}
