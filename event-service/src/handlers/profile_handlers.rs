use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Utc;
use log::info;
use rsvp_shared::models::Profile;
use rsvp_shared::store::Store;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{non_blank, UpdateProfileRequest};
use crate::view::ProfileView;

// GET /profiles/me
pub async fn get_my_profile<S>(
    State(store): State<Arc<S>>,
    Extension(user_id): Extension<String>,
) -> Result<Json<ProfileView>>
where
    S: Store,
{
    store
        .get_profile(&user_id)
        .await?
        .map(|profile| Json(ProfileView::from(profile)))
        .ok_or_else(|| AppError::not_found("Profile not found".into()))
}

// PUT /profiles/me
pub async fn update_my_profile<S>(
    State(store): State<Arc<S>>,
    Extension(user_id): Extension<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileView>>
where
    S: Store,
{
    let now = Utc::now();
    let profile = match store.get_profile(&user_id).await? {
        Some(mut profile) => {
            if request.full_name.is_some() {
                profile.full_name = non_blank(request.full_name);
            }
            if request.username.is_some() {
                profile.username = non_blank(request.username);
            }
            if request.avatar_url.is_some() {
                profile.avatar_url = non_blank(request.avatar_url);
            }
            profile.updated_at = now;
            profile
        }
        None => Profile {
            id: user_id.clone(),
            username: non_blank(request.username),
            full_name: non_blank(request.full_name),
            avatar_url: non_blank(request.avatar_url),
            created_at: now,
            updated_at: now,
        },
    };

    let saved = store.upsert_profile(profile).await?;
    info!("User {} updated their profile", user_id);

    Ok(Json(ProfileView::from(saved)))
}
