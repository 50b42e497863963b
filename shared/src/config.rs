use log::{info, warn};
use std::env;
use thiserror::Error;

pub const DEFAULT_PHOTO_BUCKET: &str = "event-photos";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Connection settings for the hosted backend (data API, object storage, auth).
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub url: String,
    pub service_key: String,
    pub jwt_secret: String,
    pub photo_bucket: String,
}

impl BackendConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required("BACKEND_URL")?;
        let service_key = required("BACKEND_SERVICE_KEY")?;
        let jwt_secret = required("AUTH_JWT_SECRET")?;
        let photo_bucket = optional("PHOTO_BUCKET", DEFAULT_PHOTO_BUCKET);

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            service_key,
            jwt_secret,
            photo_bucket,
        })
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {} not set", key);
        ConfigError::Missing(key)
    })
}

/// Reads `key`, falling back to `default` when unset.
pub fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}
