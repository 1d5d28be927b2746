use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use time::{Date, Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    insights::{self, GrowthPoint, Suggestion, WeeklySummary},
    state::AppState,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryResponse {
    #[serde(flatten)]
    pub summary: WeeklySummary,
    pub best_study_window: &'static str,
    pub stress_peak_day: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub items: Vec<Suggestion>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/weekly-summary", get(weekly_summary))
        .route("/dashboard/growth", get(growth))
        .route("/suggestions", get(suggestions))
}

/// Today and the six days before it, in UTC.
fn last_seven_days() -> (Date, Date) {
    let end = OffsetDateTime::now_utc().date();
    (end - Duration::days(6), end)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn weekly_summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<WeeklySummaryResponse>> {
    let (start, end) = last_seven_days();
    let tasks = state.tasks.list_due_between(user.id, start, end).await?;
    let moods = state.moods.range(user.id, start, end).await?;

    Ok(Json(WeeklySummaryResponse {
        summary: insights::weekly_summary(&tasks, &moods),
        best_study_window: insights::best_study_window(
            user.productivity_preference.as_deref().or(Some("morning")),
        ),
        stress_peak_day: insights::stress_peak_day(&moods),
    }))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn growth(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<GrowthPoint>>> {
    let (start, end) = last_seven_days();
    let tasks = state.tasks.list_due_between(user.id, start, end).await?;
    let moods = state.moods.range(user.id, start, end).await?;
    Ok(Json(insights::growth_series(start, end, &tasks, &moods)))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn suggestions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<SuggestionsResponse>> {
    let tasks = state.tasks.list_by_user(user.id).await?;
    Ok(Json(SuggestionsResponse {
        items: insights::suggestions(&user, &tasks),
    }))
}
