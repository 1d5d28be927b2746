use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    uploads::services::store_image,
};

const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub controller: &'static str,
}

pub fn upload_routes(max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload/image",
            post(upload_image).layer(DefaultBodyLimit::max(max_bytes)),
        )
        .route("/upload/ping", get(ping))
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok",
        controller: "upload",
    })
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mp: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut mp = mp?;
    while let Some(field) = mp.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".into());
        // Over the body limit this fails with 413.
        let data = field.bytes().await?;

        let url = store_image(&state, user.id, data, &content_type).await?;
        return Ok(Json(UploadResponse { url }));
    }
    Err(AppError::Validation("image field is required".into()))
}
