use axum::{
    extract::{Extension, State},
    Json,
};
use log::debug;
use rsvp_shared::models::EventQuery;
use rsvp_shared::store::Store;
use std::sync::Arc;

use super::{attendees_or_empty, profiles_or_empty};
use crate::error::Result;
use crate::stats::{self, HostStats};
use crate::view::unique_ids;

// GET /users/me/stats
pub async fn host_stats<S>(
    State(store): State<Arc<S>>,
    Extension(user_id): Extension<String>,
) -> Result<Json<HostStats>>
where
    S: Store,
{
    let events = store.list_events(&EventQuery::hosted_by(&user_id)).await?;
    if events.is_empty() {
        debug!("User {} hosts no events", user_id);
        return Ok(Json(HostStats::empty()));
    }

    let event_ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
    let attendees = attendees_or_empty(store.as_ref(), &event_ids).await;
    let user_ids = unique_ids(attendees.iter().map(|a| a.user_id.as_str()));
    let profiles = profiles_or_empty(store.as_ref(), &user_ids).await;

    Ok(Json(stats::compute(&events, &attendees, &profiles)))
}
