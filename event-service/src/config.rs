use rsvp_shared::config::{optional, BackendConfig, ConfigError};

pub struct ServiceConfig {
    pub port: u16,
    pub api_prefix: String,
    pub backend: BackendConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = optional("PORT", "3000");
        let port = port.parse().map_err(|_| ConfigError::Invalid {
            key: "PORT",
            value: port.clone(),
        })?;

        Ok(Self {
            port,
            api_prefix: normalize_prefix(&optional("API_PREFIX", "")),
            backend: BackendConfig::from_env()?,
        })
    }
}

/// `"api/"` becomes `"/api"`; blank stays blank.
fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
