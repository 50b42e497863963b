mod event_handlers_test;
mod photo_handlers_test;
mod profile_handlers_test;

use axum::Router;
use chrono::{DateTime, Duration, Utc};
use rsvp_shared::auth::{AUTH_SECRET_VAR, TEST_JWT_SECRET};
use rsvp_shared::models::{Attendee, Category, EventRecord, Profile, RsvpStatus};
use rsvp_shared::test_utils::mock_store::MockStore;
use rsvp_shared::test_utils::test_logging::init_test_logging;
use std::env;
use std::sync::Arc;
use uuid::Uuid;

use crate::routes::create_router_with_store;

pub(crate) const HOST_ID: &str = "host-user";

// Helper to set up the test application over an in-memory store
pub(crate) fn create_test_app() -> (Router, Arc<MockStore>) {
    init_test_logging();
    env::set_var(AUTH_SECRET_VAR, TEST_JWT_SECRET);

    let store = Arc::new(MockStore::new());
    let app = create_router_with_store(store.clone(), "");
    (app, store)
}

pub(crate) fn event_at(id: &str, host_id: &str, date: DateTime<Utc>, category: Category) -> EventRecord {
    EventRecord {
        id: id.to_string(),
        title: format!("Event {}", id),
        description: Some(format!("About {}", id)),
        date,
        location: Some("Town Hall".to_string()),
        category,
        image_url: None,
        is_private: false,
        event_password: None,
        host_id: host_id.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

pub(crate) fn attendee(event_id: &str, user_id: &str, status: RsvpStatus) -> Attendee {
    Attendee {
        id: Uuid::new_v4().to_string(),
        event_id: event_id.to_string(),
        user_id: user_id.to_string(),
        status,
        note: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub(crate) fn profile(id: &str, full_name: &str) -> Profile {
    Profile {
        id: id.to_string(),
        username: None,
        full_name: Some(full_name.to_string()),
        avatar_url: Some(format!("https://avatars.test/{}.png", id)),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
