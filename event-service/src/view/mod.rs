//! Turns joined backend rows into display-ready response shapes.
//!
//! Joins happen here, in memory, never at the query layer: callers fetch
//! events, profiles, attendees and photos separately and hand them over.

use chrono::{DateTime, Utc};
use rsvp_shared::models::{Attendee, Category, CoHost, EventRecord, Photo, Profile, RsvpStatus};
use serde::Serialize;
use std::collections::HashMap;

pub const AVATAR_PLACEHOLDER: &str = "/placeholder.svg?height=40&width=40";
pub const CARD_IMAGE_PLACEHOLDER: &str = "/placeholder.svg?height=200&width=400";
pub const DETAIL_IMAGE_PLACEHOLDER: &str = "/placeholder.svg?height=400&width=800";
pub const NO_LOCATION: &str = "No location specified";
pub const UNKNOWN_HOST: &str = "Unknown Host";
pub const UNKNOWN_ATTENDEE: &str = "Unknown";
pub const DEFAULT_PHOTO_ALT: &str = "Event photo";

/// How many attendees the detail view previews before summarising the rest.
pub const ATTENDEE_PREVIEW_LIMIT: usize = 5;

pub type ProfileMap = HashMap<String, Profile>;

pub fn profile_map(profiles: Vec<Profile>) -> ProfileMap {
    profiles.into_iter().map(|p| (p.id.clone(), p)).collect()
}

/// RSVP rows per event id. Every row counts, whatever its status.
pub fn attendee_counts(attendees: &[Attendee]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for attendee in attendees {
        *counts.entry(attendee.event_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Distinct ids in first-seen order.
pub fn unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for id in ids {
        if !id.is_empty() && !seen.iter().any(|s| s == id) {
            seen.push(id.to_string());
        }
    }
    seen
}

/// `Saturday, May 4, 2024`
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `2:00 PM`
pub fn display_time(date: DateTime<Utc>) -> String {
    date.format("%-I:%M %p").to_string()
}

/// `Sat, May 4`
pub fn ticket_date(date: DateTime<Utc>) -> String {
    date.format("%a, %b %-d").to_string()
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl PersonView {
    fn resolve(user_id: &str, profiles: &ProfileMap, fallback_name: &str) -> Self {
        let profile = profiles.get(user_id);
        Self {
            id: user_id.to_string(),
            name: profile
                .and_then(|p| p.full_name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| fallback_name.to_string()),
            avatar: profile
                .and_then(|p| p.avatar_url.clone())
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| AVATAR_PLACEHOLDER.to_string()),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: Category,
    pub category_label: String,
    pub attendees: usize,
    pub image: String,
    pub host: PersonView,
}

impl EventCard {
    pub fn build(
        event: EventRecord,
        profiles: &ProfileMap,
        counts: &HashMap<String, usize>,
    ) -> Self {
        let host = PersonView::resolve(&event.host_id, profiles, UNKNOWN_HOST);
        Self {
            attendees: counts.get(&event.id).copied().unwrap_or(0),
            id: event.id,
            title: event.title,
            date: event.date,
            location: event.location.unwrap_or_else(|| NO_LOCATION.to_string()),
            category_label: event.category.label().to_string(),
            category: event.category,
            image: event
                .image_url
                .unwrap_or_else(|| CARD_IMAGE_PLACEHOLDER.to_string()),
            host,
        }
    }
}

/// A stored event as returned by `POST /events`.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Category,
    pub image_url: Option<String>,
    pub is_private: bool,
    pub host_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRecord> for EventView {
    fn from(event: EventRecord) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            category: event.category,
            image_url: event.image_url,
            is_private: event.is_private,
            host_id: event.host_id,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            full_name: profile.full_name,
            avatar_url: profile.avatar_url,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Splits cards into `(upcoming, past)` around `now`, keeping their order.
pub fn split_by_date(cards: Vec<EventCard>, now: DateTime<Utc>) -> (Vec<EventCard>, Vec<EventCard>) {
    cards.into_iter().partition(|card| card.date >= now)
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeView {
    pub id: String,
    pub user_id: String,
    pub status: RsvpStatus,
    pub status_label: String,
    pub note: Option<String>,
    pub name: String,
    pub avatar: String,
}

impl AttendeeView {
    pub fn build(attendee: Attendee, profiles: &ProfileMap) -> Self {
        let person = PersonView::resolve(&attendee.user_id, profiles, UNKNOWN_ATTENDEE);
        Self {
            id: attendee.id,
            user_id: attendee.user_id,
            status: attendee.status,
            status_label: attendee.status.label().to_string(),
            note: attendee.note,
            name: person.name,
            avatar: person.avatar,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PhotoView {
    pub id: String,
    pub src: String,
    pub alt: String,
    pub uploaded_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<Photo> for PhotoView {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            src: photo.url,
            alt: photo
                .alt_text
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_PHOTO_ALT.to_string()),
            uploaded_by: photo.uploaded_by,
            created_at: photo.created_at,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CoHostView {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub avatar: String,
}

impl CoHostView {
    pub fn build(co_host: CoHost, profiles: &ProfileMap) -> Self {
        let person = PersonView::resolve(&co_host.user_id, profiles, UNKNOWN_ATTENDEE);
        Self {
            id: co_host.id,
            user_id: co_host.user_id,
            name: person.name,
            avatar: person.avatar,
        }
    }
}

/// Rows fetched for one event page.
pub struct DetailParts {
    pub event: EventRecord,
    pub attendees: Vec<Attendee>,
    pub photos: Vec<Photo>,
    pub co_hosts: Vec<CoHost>,
    /// Host, attendee and co-host profiles together.
    pub profiles: ProfileMap,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub display_date: String,
    pub display_time: String,
    pub ticket_date: String,
    pub location: String,
    pub category: Category,
    pub category_label: String,
    pub image: String,
    pub is_private: bool,
    pub host: PersonView,
    pub co_hosts: Vec<CoHostView>,
    pub attendee_count: usize,
    pub attendee_preview: Vec<AttendeeView>,
    pub additional_attendees: usize,
    pub attendees: Vec<AttendeeView>,
    pub photos: Vec<PhotoView>,
    pub viewer_rsvp: Option<AttendeeView>,
    pub viewer_is_host: bool,
}

impl EventDetail {
    pub fn build(parts: DetailParts, viewer: Option<&str>) -> Self {
        let DetailParts {
            event,
            attendees,
            photos,
            co_hosts,
            profiles,
        } = parts;

        let attendees: Vec<AttendeeView> = attendees
            .into_iter()
            .map(|a| AttendeeView::build(a, &profiles))
            .collect();
        let viewer_rsvp = viewer.and_then(|user_id| {
            attendees
                .iter()
                .find(|a| a.user_id == user_id)
                .cloned()
        });
        let attendee_count = attendees.len();

        Self {
            host: PersonView::resolve(&event.host_id, &profiles, UNKNOWN_HOST),
            viewer_is_host: viewer == Some(event.host_id.as_str()),
            co_hosts: co_hosts
                .into_iter()
                .map(|c| CoHostView::build(c, &profiles))
                .collect(),
            display_date: display_date(event.date),
            display_time: display_time(event.date),
            ticket_date: ticket_date(event.date),
            attendee_count,
            attendee_preview: attendees
                .iter()
                .take(ATTENDEE_PREVIEW_LIMIT)
                .cloned()
                .collect(),
            additional_attendees: attendee_count.saturating_sub(ATTENDEE_PREVIEW_LIMIT),
            attendees,
            photos: photos.into_iter().map(PhotoView::from).collect(),
            viewer_rsvp,
            id: event.id,
            title: event.title,
            description: event.description.unwrap_or_default(),
            date: event.date,
            location: event.location.unwrap_or_else(|| NO_LOCATION.to_string()),
            category_label: event.category.label().to_string(),
            category: event.category,
            image: event
                .image_url
                .unwrap_or_else(|| DETAIL_IMAGE_PLACEHOLDER.to_string()),
            is_private: event.is_private,
        }
    }
}
