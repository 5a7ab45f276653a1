use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::Category;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    pub request_timeout_secs: u64,
    pub default_category: Category,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:3001".into(),
            request_timeout_secs: 10,
            default_category: Category::NowPlaying,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Command-line flags win over file and environment.
    pub fn with_overrides(mut self, server_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(v) = server_url {
            self.server_url = v;
        }
        if let Some(v) = timeout_secs {
            self.request_timeout_secs = v;
        }
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    request_timeout_secs: Option<u64>,
    default_category: Option<String>,
}

pub fn config_path() -> PathBuf {
    std::env::var("CATALOG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
}

pub fn load_settings() -> Settings {
    load_settings_with(&config_path(), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file if present, then environment variables.
pub fn load_settings_with(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.server_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.default_category {
                    apply_category(&mut settings, &v);
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring unreadable config file: {err}"),
        }
    }

    if let Some(v) = env("CATALOG_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__DEFAULT_CATEGORY") {
        apply_category(&mut settings, &v);
    }

    settings
}

fn apply_category(settings: &mut Settings, raw: &str) {
    match raw.parse::<Category>() {
        Ok(category) => settings.default_category = category,
        Err(err) => warn!("{err}, keeping {}", settings.default_category),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
