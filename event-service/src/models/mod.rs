use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rsvp_shared::models::{Category, NewEvent, RsvpStatus};
use serde::Deserialize;

use crate::error::{AppError, Result};

// Request DTOs

/// Body of `POST /events`, mirroring the create-event form.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    /// `HH:MM`
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    pub event_password: Option<String>,
}

impl CreateEventRequest {
    /// Validates the form and builds the insert for `host_id`.
    pub fn into_new_event(self, host_id: &str) -> Result<NewEvent> {
        let title = non_blank(self.title);
        let date = non_blank(self.date);
        let time = non_blank(self.time);
        let category = non_blank(self.category);

        let (Some(title), Some(date), Some(time), Some(category)) = (title, date, time, category)
        else {
            return Err(AppError::bad_request("Missing required fields".into()));
        };

        let category: Category = category
            .parse()
            .map_err(|e: rsvp_shared::models::ParseEnumError| AppError::bad_request(e.to_string()))?;
        let starts_at = combine_date_time(&date, &time)?;

        let event_password = if self.is_private {
            match non_blank(self.event_password) {
                Some(password) => Some(password),
                None => {
                    return Err(AppError::bad_request(
                        "Please provide a password for your private event".into(),
                    ))
                }
            }
        } else {
            None
        };

        Ok(NewEvent {
            title,
            description: non_blank(self.description),
            date: starts_at,
            location: non_blank(self.location),
            category,
            image_url: non_blank(self.image_url),
            is_private: self.is_private,
            event_password,
            host_id: host_id.to_string(),
        })
    }
}

/// Combines form date and time; the result is taken to be UTC.
pub fn combine_date_time(date: &str, time: &str) -> Result<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request(format!("Invalid date: {}", date)))?;
    let time_of_day = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .map_err(|_| AppError::bad_request(format!("Invalid time: {}", time)))?;
    Ok(day.and_time(time_of_day).and_utc())
}

/// Trims and drops empty strings.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of `PUT /events/:id/rsvp`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub status: Option<String>,
    pub note: Option<String>,
}

impl RsvpRequest {
    pub fn parse_status(&self) -> Result<RsvpStatus> {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::bad_request("RSVP status required".into()))?;
        status
            .parse()
            .map_err(|e: rsvp_shared::models::ParseEnumError| AppError::bad_request(e.to_string()))
    }
}

/// Body of `POST /events/:id/photos`: either a hosted `url` or inline base64 `data`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoRequest {
    pub url: Option<String>,
    pub data: Option<String>,
    pub content_type: Option<String>,
    pub alt_text: Option<String>,
}

/// Body of `POST /events/:id/co-hosts`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AddCoHostRequest {
    pub user_id: String,
}

/// Body of `PUT /profiles/me`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}
