use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use log::{debug, info, warn};
use rsvp_shared::auth::Viewer;
use rsvp_shared::models::{Category, EventQuery, NewEvent};
use rsvp_shared::store::Store;
use std::sync::Arc;

use super::{build_cards, profiles_or_empty};
use crate::error::Result;
use crate::models::CreateEventRequest;
use crate::view::{split_by_date, unique_ids, DetailParts, EventDetail, EventView};

/// Number of upcoming events shown on the dashboard.
pub const DASHBOARD_EVENT_LIMIT: usize = 3;

/// Number of events created by the test-data endpoint.
pub const TEST_EVENT_COUNT: usize = 10;

// GET /events
pub async fn list_events<S>(State(store): State<Arc<S>>) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    let events = store.list_events(&EventQuery::default()).await?;
    debug!("Listing {} events", events.len());

    let cards = build_cards(store.as_ref(), events).await;
    let (upcoming, past) = split_by_date(cards, Utc::now());

    Ok(Json(serde_json::json!({
        "upcoming": upcoming,
        "past": past,
    })))
}

// GET /events/upcoming
pub async fn list_upcoming<S>(State(store): State<Arc<S>>) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    let events = store.list_events(&EventQuery::upcoming(Utc::now())).await?;
    let cards = build_cards(store.as_ref(), events).await;

    Ok(Json(serde_json::json!({ "events": cards })))
}

// GET /events/:id
pub async fn get_event<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Json<EventDetail>>
where
    S: Store,
{
    let event = store.get_event(&id).await?;

    let attendees = match store.get_attendees_by_event(&id).await {
        Ok(attendees) => attendees,
        Err(e) => {
            warn!("Could not load attendees for event {}: {}", id, e);
            Vec::new()
        }
    };
    let photos = match store.get_photos_by_event(&id).await {
        Ok(photos) => photos,
        Err(e) => {
            warn!("Could not load photos for event {}: {}", id, e);
            Vec::new()
        }
    };
    let co_hosts = match store.get_co_hosts_by_event(&id).await {
        Ok(co_hosts) => co_hosts,
        Err(e) => {
            warn!("Could not load co-hosts for event {}: {}", id, e);
            Vec::new()
        }
    };

    let people = unique_ids(
        std::iter::once(event.host_id.as_str())
            .chain(attendees.iter().map(|a| a.user_id.as_str()))
            .chain(co_hosts.iter().map(|c| c.user_id.as_str())),
    );
    let profiles = profiles_or_empty(store.as_ref(), &people).await;

    let detail = EventDetail::build(
        DetailParts {
            event,
            attendees,
            photos,
            co_hosts,
            profiles,
        },
        viewer.user_id(),
    );

    Ok(Json(detail))
}

// GET /dashboard
pub async fn dashboard<S>(
    State(store): State<Arc<S>>,
    Extension(viewer): Extension<Viewer>,
) -> Result<Json<serde_json::Value>>
where
    S: Store,
{
    let now = Utc::now();
    let upcoming = store
        .list_events(&EventQuery::upcoming(now).with_limit(DASHBOARD_EVENT_LIMIT))
        .await?;
    let past_count = store.count_events(&EventQuery::past(now)).await?;

    let cards = build_cards(store.as_ref(), upcoming).await;
    let total_attendees: usize = cards.iter().map(|c| c.attendees).sum();

    debug!(
        "Dashboard for {}: {} upcoming, {} past",
        viewer.user_id().unwrap_or("anonymous"),
        cards.len(),
        past_count
    );

    Ok(Json(serde_json::json!({
        "upcomingEvents": cards,
        "totalAttendees": total_attendees,
        "pastEventsCount": past_count,
    })))
}

// POST /events
pub async fn create_event<S>(
    State(store): State<Arc<S>>,
    Extension(user_id): Extension<String>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>)>
where
    S: Store,
{
    let new_event = request.into_new_event(&user_id)?;
    let event = store.create_event(new_event).await?;
    info!("User {} created event {}", user_id, event.id);

    let redirect = format!("/events/{}", event.id);
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "event": EventView::from(event),
            "redirectTo": redirect,
        })),
    ))
}

// POST /events/test-data
pub async fn seed_test_events<S>(
    State(store): State<Arc<S>>,
    Extension(user_id): Extension<String>,
) -> Result<(StatusCode, Json<serde_json::Value>)>
where
    S: Store,
{
    let start = Utc::now();
    let events: Vec<NewEvent> = (1..=TEST_EVENT_COUNT)
        .map(|n| NewEvent {
            title: format!("Test Event {}", n),
            description: Some(format!("This is a test event number {}", n)),
            date: start + Duration::days(n as i64),
            location: Some(format!("Location {}", n)),
            category: Category::ALL[(n - 1) % Category::ALL.len()],
            image_url: None,
            is_private: false,
            event_password: None,
            host_id: user_id.clone(),
        })
        .collect();

    let created = store.create_events(events).await?;
    info!("Created {} test events for user {}", created.len(), user_id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "count": created.len(),
        })),
    ))
}

