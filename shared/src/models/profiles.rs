use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User metadata kept apart from the auth identity. `id` equals the auth user id.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
