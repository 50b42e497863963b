use axum::{
    extract::{Extension, Path, State},
    Json,
};
use log::info;
use rsvp_shared::models::NewAttendee;
use rsvp_shared::store::Store;
use std::sync::Arc;

use super::profiles_or_empty;
use crate::error::Result;
use crate::models::{non_blank, RsvpRequest};
use crate::view::{unique_ids, AttendeeView};

// PUT /events/:id/rsvp
pub async fn submit_rsvp<S>(
    State(store): State<Arc<S>>,
    Path(event_id): Path<String>,
    Extension(user_id): Extension<String>,
    Json(request): Json<RsvpRequest>,
) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    let status = request.parse_status()?;
    let note = non_blank(request.note);

    // 404 before touching attendees
    store.get_event(&event_id).await?;

    let rsvp = match store.find_attendee(&event_id, &user_id).await? {
        Some(existing) => {
            info!(
                "User {} changed RSVP for event {} to {}",
                user_id, event_id, status
            );
            store.update_attendee(&existing.id, status, note).await?
        }
        None => {
            info!("User {} RSVP'd {} to event {}", user_id, status, event_id);
            store
                .create_attendee(NewAttendee {
                    event_id: event_id.clone(),
                    user_id: user_id.clone(),
                    status,
                    note,
                })
                .await?
        }
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "rsvp": rsvp,
    })))
}

// GET /events/:id/attendees
pub async fn list_attendees<S>(
    State(store): State<Arc<S>>,
    Path(event_id): Path<String>,
) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    store.get_event(&event_id).await?;
    let attendees = store.get_attendees_by_event(&event_id).await?;

    let user_ids = unique_ids(attendees.iter().map(|a| a.user_id.as_str()));
    let profiles = profiles_or_empty(store.as_ref(), &user_ids).await;

    let attendees: Vec<AttendeeView> = attendees
        .into_iter()
        .map(|a| AttendeeView::build(a, &profiles))
        .collect();

    Ok(Json(serde_json::json!({ "attendees": attendees })))
}
