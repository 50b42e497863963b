use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, info};
use rsvp_shared::models::NewPhoto;
use rsvp_shared::store::Store;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{non_blank, UploadPhotoRequest};
use crate::view::PhotoView;

/// Maps an accepted image content type to its file extension.
fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// Accepts both raw base64 and `data:<type>;base64,` URLs.
fn decode_image(data: &str) -> Result<Vec<u8>> {
    let payload = match data.split_once(";base64,") {
        Some((_, payload)) => payload,
        None => data,
    };
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| AppError::bad_request("Photo data is not valid base64".into()))?;
    if bytes.is_empty() {
        return Err(AppError::bad_request("Photo data is empty".into()));
    }
    Ok(bytes)
}

// GET /events/:id/photos
pub async fn list_photos<S>(
    State(store): State<Arc<S>>,
    Path(event_id): Path<String>,
) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    store.get_event(&event_id).await?;
    let photos: Vec<PhotoView> = store
        .get_photos_by_event(&event_id)
        .await?
        .into_iter()
        .map(PhotoView::from)
        .collect();

    Ok(Json(serde_json::json!({ "photos": photos })))
}

// POST /events/:id/photos
pub async fn upload_photo<S>(
    State(store): State<Arc<S>>,
    Path(event_id): Path<String>,
    Extension(user_id): Extension<String>,
    Json(request): Json<UploadPhotoRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)>
where
    S: Store,
{
    store.get_event(&event_id).await?;

    let url = match (non_blank(request.url), non_blank(request.data)) {
        (Some(url), None) => url,
        (None, Some(data)) => {
            let content_type = non_blank(request.content_type).ok_or_else(|| {
                AppError::bad_request("contentType is required with photo data".into())
            })?;
            let extension = image_extension(&content_type).ok_or_else(|| {
                AppError::bad_request(format!("Unsupported image type: {}", content_type))
            })?;
            let bytes = decode_image(&data)?;

            let path = format!("{}/{}.{}", event_id, Uuid::new_v4(), extension);
            debug!("Uploading {} bytes to {}", bytes.len(), path);
            store.upload_object(&path, &content_type, bytes).await?
        }
        _ => {
            return Err(AppError::bad_request(
                "Provide either a photo url or photo data".into(),
            ))
        }
    };

    let photo = store
        .create_photo(NewPhoto {
            event_id: event_id.clone(),
            uploaded_by: user_id.clone(),
            url,
            alt_text: non_blank(request.alt_text),
        })
        .await?;
    info!("User {} added photo {} to event {}", user_id, photo.id, event_id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "photo": PhotoView::from(photo) })),
    ))
}
