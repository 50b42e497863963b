use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use super::{AttendeeStore, CoHostStore, EventStore, PhotoStore, ProfileStore};
use crate::config::BackendConfig;
use crate::error::{Result, StoreError};
use crate::models::{
    Attendee, CoHost, EventQuery, EventRecord, NewAttendee, NewEvent, NewPhoto, Photo, Profile,
    RsvpStatus,
};

const EVENTS_TABLE: &str = "events";
const ATTENDEES_TABLE: &str = "attendees";
const PROFILES_TABLE: &str = "profiles";
const PHOTOS_TABLE: &str = "photos";
const CO_HOSTS_TABLE: &str = "co_hosts";

/// Postgres error code for a value that does not parse as the column type.
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// Store backed by the hosted REST data API and its object storage.
#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
    service_key: String,
    photo_bucket: String,
}

impl PostgrestStore {
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &BackendConfig) -> Self {
        info!("Creating PostgrestStore for {}", config.url);
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            photo_bucket: config.photo_bucket.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn select<T>(&self, table: &str, params: &[(&str, String)]) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        debug!("Selecting from {} with {:?}", table, params);
        let response = self
            .request(Method::GET, &self.table_url(table))
            .query(&[("select", "*")])
            .query(params)
            .send()
            .await?;
        decode(check(response).await?).await
    }

    async fn insert<B, T>(&self, table: &str, body: &B, prefer: &str) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Inserting into {}", table);
        let response = self
            .request(Method::POST, &self.table_url(table))
            .header("Prefer", prefer)
            .json(body)
            .send()
            .await?;
        decode(check(response).await?).await
    }

    async fn update<B, T>(&self, table: &str, params: &[(&str, String)], body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("Updating {} with {:?}", table, params);
        let response = self
            .request(Method::PATCH, &self.table_url(table))
            .header("Prefer", RETURN_REPRESENTATION)
            .query(params)
            .json(body)
            .send()
            .await?;
        decode(check(response).await?).await
    }
}

/// Maps non-success responses onto `StoreError`.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    error!("Backend request failed with {}: {}", status, message);
    Err(match status {
        StatusCode::NOT_FOUND => StoreError::NotFound(message),
        StatusCode::CONFLICT => StoreError::Conflict(message),
        _ => StoreError::Backend {
            status: status.as_u16(),
            message,
        },
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

fn first<T>(rows: Vec<T>, what: &str) -> Result<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::NotFound(what.to_string()))
}

fn eq(value: &str) -> String {
    format!("eq.{}", value)
}

fn in_list(values: &[String]) -> String {
    format!("in.({})", values.join(","))
}

fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn event_filters(query: &EventQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    // Both bounds on the same column need separate `date` pairs.
    if let Some(from) = query.starts_from {
        params.push(("date", format!("gte.{}", timestamp(from))));
    }
    if let Some(before) = query.starts_before {
        params.push(("date", format!("lt.{}", timestamp(before))));
    }
    if let Some(host_id) = &query.host_id {
        params.push(("host_id", eq(host_id)));
    }
    params
}

/// Total from a `Content-Range` header such as `0-9/42` or `*/0`.
fn parse_content_range(value: &str) -> Option<usize> {
    value.rsplit('/').next()?.parse().ok()
}

#[async_trait]
impl EventStore for PostgrestStore {
    async fn create_event(&self, event: NewEvent) -> Result<EventRecord> {
        let rows = self
            .insert(EVENTS_TABLE, &event, RETURN_REPRESENTATION)
            .await?;
        first(rows, "created event")
    }

    async fn create_events(&self, events: Vec<NewEvent>) -> Result<Vec<EventRecord>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }
        self.insert(EVENTS_TABLE, &events, RETURN_REPRESENTATION)
            .await
    }

    async fn get_event(&self, id: &str) -> Result<EventRecord> {
        let rows = match self.select(EVENTS_TABLE, &[("id", eq(id))]).await {
            // An id that is not a uuid can never match a row.
            Err(StoreError::Backend { status: 400, message })
                if message.contains(INVALID_TEXT_REPRESENTATION) =>
            {
                debug!("Event id {} is malformed: {}", id, message);
                return Err(StoreError::NotFound(format!("event {}", id)));
            }
            other => other?,
        };
        first(rows, &format!("event {}", id))
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<EventRecord>> {
        let mut params = event_filters(query);
        params.push(("order", "date.asc".to_string()));
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        self.select(EVENTS_TABLE, &params).await
    }

    async fn count_events(&self, query: &EventQuery) -> Result<usize> {
        let mut params = event_filters(query);
        params.push(("select", "id".to_string()));
        params.push(("limit", "1".to_string()));

        let response = self
            .request(Method::GET, &self.table_url(EVENTS_TABLE))
            .header("Prefer", "count=exact")
            .query(&params)
            .send()
            .await?;
        let response = check(response).await?;

        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| StoreError::Decode("missing or malformed Content-Range".into()))?;

        match query.limit {
            Some(limit) => Ok(total.min(limit)),
            None => Ok(total),
        }
    }
}

#[async_trait]
impl AttendeeStore for PostgrestStore {
    async fn get_attendees_by_event(&self, event_id: &str) -> Result<Vec<Attendee>> {
        self.select(ATTENDEES_TABLE, &[("event_id", eq(event_id))])
            .await
    }

    async fn get_attendees_for_events(&self, event_ids: &[String]) -> Result<Vec<Attendee>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(ATTENDEES_TABLE, &[("event_id", in_list(event_ids))])
            .await
    }

    async fn find_attendee(&self, event_id: &str, user_id: &str) -> Result<Option<Attendee>> {
        let rows: Vec<Attendee> = self
            .select(
                ATTENDEES_TABLE,
                &[("event_id", eq(event_id)), ("user_id", eq(user_id))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn create_attendee(&self, attendee: NewAttendee) -> Result<Attendee> {
        let rows = self
            .insert(ATTENDEES_TABLE, &attendee, RETURN_REPRESENTATION)
            .await?;
        first(rows, "created attendee")
    }

    async fn update_attendee(
        &self,
        id: &str,
        status: RsvpStatus,
        note: Option<String>,
    ) -> Result<Attendee> {
        let body = json!({
            "status": status,
            "note": note,
            "updated_at": timestamp(Utc::now()),
        });
        let rows = self
            .update(ATTENDEES_TABLE, &[("id", eq(id))], &body)
            .await?;
        first(rows, &format!("attendee {}", id))
    }
}

#[async_trait]
impl ProfileStore for PostgrestStore {
    async fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        let rows: Vec<Profile> = self.select(PROFILES_TABLE, &[("id", eq(id))]).await?;
        Ok(rows.into_iter().next())
    }

    async fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(PROFILES_TABLE, &[("id", in_list(ids))]).await
    }

    async fn upsert_profile(&self, profile: Profile) -> Result<Profile> {
        let rows = self
            .insert(PROFILES_TABLE, &profile, MERGE_DUPLICATES)
            .await?;
        first(rows, "upserted profile")
    }
}

#[async_trait]
impl PhotoStore for PostgrestStore {
    async fn get_photos_by_event(&self, event_id: &str) -> Result<Vec<Photo>> {
        self.select(PHOTOS_TABLE, &[("event_id", eq(event_id))])
            .await
    }

    async fn create_photo(&self, photo: NewPhoto) -> Result<Photo> {
        let rows = self
            .insert(PHOTOS_TABLE, &photo, RETURN_REPRESENTATION)
            .await?;
        first(rows, "created photo")
    }

    async fn upload_object(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.photo_bucket, path
        );
        info!("Uploading {} bytes to {}", bytes.len(), url);

        let response = self
            .request(Method::POST, &url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;
        check(response).await?;

        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.photo_bucket, path
        ))
    }
}

#[async_trait]
impl CoHostStore for PostgrestStore {
    async fn get_co_hosts_by_event(&self, event_id: &str) -> Result<Vec<CoHost>> {
        self.select(CO_HOSTS_TABLE, &[("event_id", eq(event_id))])
            .await
    }

    async fn add_co_host(&self, event_id: &str, user_id: &str) -> Result<CoHost> {
        let body = json!({ "event_id": event_id, "user_id": user_id });
        let rows = self
            .insert(CO_HOSTS_TABLE, &body, RETURN_REPRESENTATION)
            .await?;
        first(rows, "created co-host")
    }
}
