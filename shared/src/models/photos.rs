use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row of the `photos` table.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Photo {
    pub id: String,
    pub event_id: String,
    pub uploaded_by: String,
    pub url: String,
    pub alt_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewPhoto {
    pub event_id: String,
    pub uploaded_by: String,
    pub url: String,
    pub alt_text: Option<String>,
}
