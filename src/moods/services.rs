use std::ops::RangeInclusive;

use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::moods::{
    dto::CreateMoodRequest,
    repo_types::{MoodLog, NewMoodLog},
};
use crate::state::AppState;

const MOOD_RANGE: RangeInclusive<i32> = 1..=5;
const STRESS_RANGE: RangeInclusive<i32> = 1..=10;

pub async fn create(state: &AppState, user_id: Uuid, req: CreateMoodRequest) -> AppResult<MoodLog> {
    if !MOOD_RANGE.contains(&req.mood) {
        return Err(AppError::Validation("mood must be between 1 and 5".into()));
    }
    if !STRESS_RANGE.contains(&req.stress) {
        return Err(AppError::Validation("stress must be between 1 and 10".into()));
    }

    let now = OffsetDateTime::now_utc();
    let log = state
        .moods
        .insert(NewMoodLog {
            user_id,
            date: req.date.unwrap_or_else(|| now.date()),
            mood: req.mood,
            stress: req.stress,
            note: req.note,
            created_at: now,
        })
        .await?;
    info!(%user_id, mood_id = %log.id, date = %log.date, "mood logged");
    Ok(log)
}

pub async fn latest(state: &AppState, user_id: Uuid) -> AppResult<Vec<MoodLog>> {
    Ok(state.moods.latest(user_id).await?)
}

pub async fn range(state: &AppState, user_id: Uuid, start: Date, end: Date) -> AppResult<Vec<MoodLog>> {
    if start > end {
        return Err(AppError::Validation("start must not be after end".into()));
    }
    Ok(state.moods.range(user_id, start, end).await?)
}
