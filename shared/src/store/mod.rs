use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Attendee, CoHost, EventQuery, EventRecord, NewAttendee, NewEvent, NewPhoto, Photo, Profile,
    RsvpStatus,
};

pub mod postgrest;

/// Access to the `events` table.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord>;
    async fn create_events(&self, events: Vec<NewEvent>) -> Result<Vec<EventRecord>>;
    /// Fails with `StoreError::NotFound` when no event has this id.
    async fn get_event(&self, id: &str) -> Result<EventRecord>;
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventRecord>>;
    async fn count_events(&self, query: &EventQuery) -> Result<usize>;
}

/// Access to the `attendees` table.
#[async_trait]
pub trait AttendeeStore: Send + Sync {
    async fn get_attendees_by_event(&self, event_id: &str) -> Result<Vec<Attendee>>;
    async fn get_attendees_for_events(&self, event_ids: &[String]) -> Result<Vec<Attendee>>;
    async fn find_attendee(&self, event_id: &str, user_id: &str) -> Result<Option<Attendee>>;
    async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee>;
    async fn update_attendee(
        &self,
        id: &str,
        status: RsvpStatus,
        note: Option<String>,
    ) -> Result<Attendee>;
}

/// Access to the `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>>;
    async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>>;
    async fn upsert_profile(&self, profile: Profile) -> Result<Profile>;
}

/// Access to the `photos` table and the photo bucket.
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn get_photos_by_event(&self, event_id: &str) -> Result<Vec<Photo>>;
    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo>;
    /// Stores raw bytes under `path` and returns their public URL.
    async fn upload_object(&self, path: &str, content_type: &str, bytes: Vec<u8>)
        -> Result<String>;
}

/// Access to the `co_hosts` table.
#[async_trait]
pub trait CoHostStore: Send + Sync {
    async fn get_co_hosts_by_event(&self, event_id: &str) -> Result<Vec<CoHost>>;
    async fn add_co_host(&self, event_id: &str, user_id: &str) -> Result<CoHost>;
}

/// Everything a handler may need from the backend.
pub trait Store: EventStore + AttendeeStore + ProfileStore + PhotoStore + CoHostStore {}

impl<T> Store for T where T: EventStore + AttendeeStore + ProfileStore + PhotoStore + CoHostStore {}
