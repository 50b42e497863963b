use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{
    Attendee, CoHost, EventQuery, EventRecord, NewAttendee, NewEvent, NewPhoto, Photo, Profile,
    RsvpStatus,
};
use crate::store::{AttendeeStore, CoHostStore, EventStore, PhotoStore, ProfileStore};

pub const MOCK_STORAGE_URL: &str = "https://storage.test/event-photos";

/// In-memory store for handler tests.
#[derive(Default)]
pub struct MockStore {
    events: RwLock<Vec<EventRecord>>,
    attendees: RwLock<Vec<Attendee>>,
    profiles: RwLock<HashMap<String, Profile>>,
    photos: RwLock<Vec<Photo>>,
    co_hosts: RwLock<Vec<CoHost>>,
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
    fail_profiles: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every profile read fail, to exercise fallback paths.
    pub fn fail_profile_reads(&self, fail: bool) {
        self.fail_profiles.store(fail, Ordering::SeqCst);
    }

    pub async fn insert_event(&self, event: EventRecord) {
        self.events.write().await.push(event);
    }

    pub async fn insert_attendee(&self, attendee: Attendee) {
        self.attendees.write().await.push(attendee);
    }

    pub async fn insert_profile(&self, profile: Profile) {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile);
    }

    pub async fn insert_photo(&self, photo: Photo) {
        self.photos.write().await.push(photo);
    }

    pub async fn all_events(&self) -> Vec<EventRecord> {
        self.events.read().await.clone()
    }

    pub async fn all_attendees(&self) -> Vec<Attendee> {
        self.attendees.read().await.clone()
    }

    pub async fn object(&self, path: &str) -> Option<(String, Vec<u8>)> {
        self.objects.read().await.get(path).cloned()
    }

    fn check_profiles(&self) -> Result<()> {
        if self.fail_profiles.load(Ordering::SeqCst) {
            return Err(StoreError::Backend {
                status: 503,
                message: "profiles unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn record_from(event: NewEvent) -> EventRecord {
    let now = Utc::now();
    EventRecord {
        id: new_id(),
        title: event.title,
        description: event.description,
        date: event.date,
        location: event.location,
        category: event.category,
        image_url: event.image_url,
        is_private: event.is_private,
        event_password: event.event_password,
        host_id: event.host_id,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl EventStore for MockStore {
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord> {
        let record = record_from(event);
        self.events.write().await.push(record.clone());
        Ok(record)
    }

    async fn create_events(&self, events: Vec<NewEvent>) -> Result<Vec<EventRecord>> {
        let records: Vec<EventRecord> = events.into_iter().map(record_from).collect();
        self.events.write().await.extend(records.iter().cloned());
        Ok(records)
    }

    async fn get_event(&self, id: &str) -> Result<EventRecord> {
        self.events
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("event {}", id)))
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventRecord>> {
        let mut events: Vec<EventRecord> = self
            .events
            .read()
            .await
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        if let Some(limit) = query.limit {
            events.truncate(limit);
        }
        Ok(events)
    }

    async fn count_events(&self, query: &EventQuery) -> Result<usize> {
        Ok(self.list_events(query).await?.len())
    }
}

#[async_trait]
impl AttendeeStore for MockStore {
    async fn get_attendees_by_event(&self, event_id: &str) -> Result<Vec<Attendee>> {
        Ok(self
            .attendees
            .read()
            .await
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn get_attendees_for_events(&self, event_ids: &[String]) -> Result<Vec<Attendee>> {
        Ok(self
            .attendees
            .read()
            .await
            .iter()
            .filter(|a| event_ids.contains(&a.event_id))
            .cloned()
            .collect())
    }

    async fn find_attendee(&self, event_id: &str, user_id: &str) -> Result<Option<Attendee>> {
        Ok(self
            .attendees
            .read()
            .await
            .iter()
            .find(|a| a.event_id == event_id && a.user_id == user_id)
            .cloned())
    }

    async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee> {
        let now = Utc::now();
        let record = Attendee {
            id: new_id(),
            event_id: attendee.event_id,
            user_id: attendee.user_id,
            status: attendee.status,
            note: attendee.note,
            created_at: now,
            updated_at: now,
        };
        self.attendees.write().await.push(record.clone());
        Ok(record)
    }

    async fn update_attendee(
        &self,
        id: &str,
        status: RsvpStatus,
        note: Option<String>,
    ) -> Result<Attendee> {
        let mut attendees = self.attendees.write().await;
        let attendee = attendees
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("attendee {}", id)))?;
        attendee.status = status;
        attendee.note = note;
        attendee.updated_at = Utc::now();
        Ok(attendee.clone())
    }
}

#[async_trait]
impl ProfileStore for MockStore {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        self.check_profiles()?;
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>> {
        self.check_profiles()?;
        let profiles = self.profiles.read().await;
        Ok(ids.iter().filter_map(|id| profiles.get(id).cloned()).collect())
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<Profile> {
        self.profiles
            .write()
            .await
            .insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }
}

#[async_trait]
impl PhotoStore for MockStore {
    async fn get_photos_by_event(&self, event_id: &str) -> Result<Vec<Photo>> {
        Ok(self
            .photos
            .read()
            .await
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo> {
        let record = Photo {
            id: new_id(),
            event_id: photo.event_id,
            uploaded_by: photo.uploaded_by,
            url: photo.url,
            alt_text: photo.alt_text,
            created_at: Utc::now(),
        };
        self.photos.write().await.push(record.clone());
        Ok(record)
    }

    async fn upload_object(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        self.objects
            .write()
            .await
            .insert(path.to_string(), (content_type.to_string(), bytes));
        Ok(format!("{}/{}", MOCK_STORAGE_URL, path))
    }
}

#[async_trait]
impl CoHostStore for MockStore {
    async fn get_co_hosts_by_event(&self, event_id: &str) -> Result<Vec<CoHost>> {
        Ok(self
            .co_hosts
            .read()
            .await
            .iter()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn add_co_host(&self, event_id: &str, user_id: &str) -> Result<CoHost> {
        let mut co_hosts = self.co_hosts.write().await;
        if co_hosts
            .iter()
            .any(|c| c.event_id == event_id && c.user_id == user_id)
        {
            return Err(StoreError::Conflict(format!(
                "{} already co-hosts {}",
                user_id, event_id
            )));
        }
        let record = CoHost {
            id: new_id(),
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        co_hosts.push(record.clone());
        Ok(record)
    }
}
