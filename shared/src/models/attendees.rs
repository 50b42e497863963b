use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum RsvpStatus {
    Going,
    Maybe,
    NotGoing,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Going => "going",
            RsvpStatus::Maybe => "maybe",
            RsvpStatus::NotGoing => "not-going",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsvpStatus::Going => "Going",
            RsvpStatus::Maybe => "Maybe",
            RsvpStatus::NotGoing => "Not Going",
        }
    }
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RsvpStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "going" => Ok(RsvpStatus::Going),
            "maybe" => Ok(RsvpStatus::Maybe),
            "not-going" => Ok(RsvpStatus::NotGoing),
            other => Err(ParseEnumError {
                kind: "RSVP status",
                value: other.to_string(),
            }),
        }
    }
}

/// Row of the `attendees` table: one RSVP per (event, user).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Attendee {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: RsvpStatus,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewAttendee {
    pub event_id: String,
    pub user_id: String,
    pub status: RsvpStatus,
    pub note: Option<String>,
}
