use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use shared::protocol::ReservationSchema;
use tracing::warn;

pub const SETTINGS_FILE: &str = "storefront.toml";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    /// `None` leaves requests on the HTTP client's own defaults.
    pub request_timeout_secs: Option<u64>,
    pub reservation_schema: ReservationSchema,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            request_timeout_secs: None,
            reservation_schema: ReservationSchema::default(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    backend_url: Option<String>,
    request_timeout_secs: Option<u64>,
    reservation_schema: Option<ReservationSchema>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if readable, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.backend_url {
                    settings.backend_url = v;
                }
                if file_cfg.request_timeout_secs.is_some() {
                    settings.request_timeout_secs = file_cfg.request_timeout_secs;
                }
                if let Some(v) = file_cfg.reservation_schema {
                    settings.reservation_schema = v;
                }
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("BACKEND_URL") {
        settings.backend_url = v;
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        settings.backend_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = (parsed > 0).then_some(parsed);
        }
    }

    if let Some(v) = env("APP__RESERVATION_SCHEMA") {
        if let Ok(parsed) = v.parse::<ReservationSchema>() {
            settings.reservation_schema = parsed;
        }
    }

    settings.backend_url = normalize_backend_url(&settings.backend_url);
    settings
}

pub(crate) fn normalize_backend_url(raw_backend_url: &str) -> String {
    let trimmed = raw_backend_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_BACKEND_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
