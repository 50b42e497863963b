pub mod co_host_handlers;
pub mod event_handlers;
pub mod photo_handlers;
pub mod profile_handlers;
pub mod rsvp_handlers;
pub mod stats_handlers;

use log::warn;
use rsvp_shared::models::{Attendee, EventRecord};
use rsvp_shared::store::Store;
use std::collections::HashMap;

use crate::view::{attendee_counts, profile_map, unique_ids, EventCard, ProfileMap};

// Secondary lookups degrade to empty data instead of failing the page.

pub(crate) async fn profiles_or_empty<S: Store>(store: &S, ids: &[String]) -> ProfileMap {
    if ids.is_empty() {
        return ProfileMap::new();
    }
    match store.get_profiles(ids).await {
        Ok(profiles) => profile_map(profiles),
        Err(e) => {
            warn!("Could not load {} profiles: {}", ids.len(), e);
            ProfileMap::new()
        }
    }
}

pub(crate) async fn attendees_or_empty<S: Store>(store: &S, event_ids: &[String]) -> Vec<Attendee> {
    if event_ids.is_empty() {
        return Vec::new();
    }
    match store.get_attendees_for_events(event_ids).await {
        Ok(attendees) => attendees,
        Err(e) => {
            warn!("Could not load attendees for {} events: {}", event_ids.len(), e);
            Vec::new()
        }
    }
}

/// Formats events as cards with host profiles and RSVP counts.
pub(crate) async fn build_cards<S: Store>(store: &S, events: Vec<EventRecord>) -> Vec<EventCard> {
    let event_ids: Vec<String> = events.iter().map(|e| e.id.clone()).collect();
    let host_ids = unique_ids(events.iter().map(|e| e.host_id.as_str()));

    let attendees = attendees_or_empty(store, &event_ids).await;
    let counts: HashMap<String, usize> = attendee_counts(&attendees);
    let profiles = profiles_or_empty(store, &host_ids).await;

    events
        .into_iter()
        .map(|event| EventCard::build(event, &profiles, &counts))
        .collect()
}
