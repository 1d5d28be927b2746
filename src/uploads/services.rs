use anyhow::Context;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn ext_from_mime(ct: &str) -> &str {
    let essence = ct.split(';').next().unwrap_or_default().trim();
    match essence {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/heic" => "heic",
        "image/gif" => "gif",
        other => other
            .split_once('/')
            .map(|(_, sub)| sub)
            .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or("bin"),
    }
}

/// Object key `images/<user>/<uuid>.<ext>` for a new upload.
pub fn image_key(user_id: Uuid, content_type: &str) -> String {
    format!(
        "images/{}/{}.{}",
        user_id,
        Uuid::new_v4(),
        ext_from_mime(content_type)
    )
}

/// Stores one image for the user and returns its public URL.
pub async fn store_image(
    st: &AppState,
    user_id: Uuid,
    body: Bytes,
    content_type: &str,
) -> AppResult<String> {
    if body.is_empty() {
        return Err(AppError::Validation("File is empty".into()));
    }
    if !content_type.starts_with("image/") {
        return Err(AppError::Validation("File must be an image".into()));
    }

    let key = image_key(user_id, content_type);
    let size = body.len();
    st.storage
        .put_object(&key, body, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    info!(%user_id, %key, size, "image stored");
    Ok(st.storage.public_url(&key))
}
