use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use client_core::ListConfig;
use serde::Deserialize;
use shared::domain::{SortDirection, SortFields};

pub const SETTINGS_FILE: &str = "console.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_url: String,
    pub collection: String,
    pub sort_fields: Vec<String>,
    pub sort_field: String,
    pub sort_direction: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            collection: "persons".into(),
            sort_fields: vec!["firstName".into(), "lastName".into()],
            sort_field: "lastName".into(),
            sort_direction: "ASC".into(),
            page_size: 5,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    collection: Option<String>,
    sort_fields: Option<Vec<String>>,
    sort_field: Option<String>,
    sort_direction: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn list_config(&self) -> anyhow::Result<ListConfig> {
        let sort_fields = SortFields::new(self.sort_fields.iter().cloned())
            .context("invalid sort_fields setting")?;
        let sort_field = sort_fields
            .field(&self.sort_field)
            .context("invalid sort_field setting")?;
        let sort_direction = self
            .sort_direction
            .parse::<SortDirection>()
            .context("invalid sort_direction setting")?;
        anyhow::ensure!(self.page_size > 0, "page_size must be positive");

        Ok(ListConfig {
            sort_fields,
            sort_field,
            sort_direction,
            page_size: self.page_size,
        })
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment variables.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__COLLECTION") {
        settings.collection = v;
    }

    if let Some(v) = env("APP__SORT_FIELDS") {
        settings.sort_fields = v.split(',').map(|name| name.trim().to_string()).collect();
    }
    if let Some(v) = env("APP__SORT_FIELD") {
        settings.sort_field = v;
    }
    if let Some(v) = env("APP__SORT_DIR") {
        settings.sort_direction = v;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.page_size = parsed;
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_url {
        settings.api_url = v;
    }
    if let Some(v) = file_cfg.collection {
        settings.collection = v;
    }
    if let Some(v) = file_cfg.sort_fields {
        settings.sort_fields = v;
    }
    if let Some(v) = file_cfg.sort_field {
        settings.sort_field = v;
    }
    if let Some(v) = file_cfg.sort_direction {
        settings.sort_direction = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
