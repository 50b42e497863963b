use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ParseEnumError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Movie,
    Party,
    Food,
    Travel,
    Picnic,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Movie,
        Category::Party,
        Category::Food,
        Category::Travel,
        Category::Picnic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Movie => "movie",
            Category::Party => "party",
            Category::Food => "food",
            Category::Travel => "travel",
            Category::Picnic => "picnic",
        }
    }

    /// Display label, e.g. `Movie`.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Movie => "Movie",
            Category::Party => "Party",
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Picnic => "Picnic",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "category",
                value: s.to_string(),
            })
    }
}

/// Row of the `events` table.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Category,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    // Stored for private events but never checked anywhere.
    #[serde(default, skip_serializing)]
    pub event_password: Option<String>,
    pub host_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert shape for `events`; ids and timestamps are assigned by the backend.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub category: Category,
    pub image_url: Option<String>,
    pub is_private: bool,
    pub event_password: Option<String>,
    pub host_id: String,
}

/// Filter for event listings. Results are always ordered by date, ascending.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    pub starts_from: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
    pub host_id: Option<String>,
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn upcoming(now: DateTime<Utc>) -> Self {
        Self {
            starts_from: Some(now),
            ..Default::default()
        }
    }

    pub fn past(now: DateTime<Utc>) -> Self {
        Self {
            starts_before: Some(now),
            ..Default::default()
        }
    }

    pub fn hosted_by(host_id: &str) -> Self {
        Self {
            host_id: Some(host_id.to_string()),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, event: &EventRecord) -> bool {
        self.starts_from.map_or(true, |from| event.date >= from)
            && self.starts_before.map_or(true, |before| event.date < before)
            && self
                .host_id
                .as_deref()
                .map_or(true, |host| event.host_id == host)
    }
}

/// Row of the `co_hosts` table.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CoHost {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
