use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates;

/// One mood check-in. Several per day are allowed.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "dates::iso_date")]
    pub date: Date,
    pub mood: i32,   // 1-5
    pub stress: i32, // 1-10
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMoodLog {
    pub user_id: Uuid,
    pub date: Date,
    pub mood: i32,
    pub stress: i32,
    pub note: Option<String>,
    pub created_at: OffsetDateTime,
}
