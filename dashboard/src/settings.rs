//! Dashboard settings
//!
//! Persisted as JSON in browser localStorage. Anything unreadable falls back
//! to the defaults so a bad stored value never blocks the dashboard.

use serde::{Deserialize, Serialize};

pub const SETTINGS_STORAGE_KEY: &str = "dashboard.settings.v1";

pub const MIN_POLL_INTERVAL_MS: u32 = 1_000;
pub const MAX_POLL_INTERVAL_MS: u32 = 300_000;
pub const MAX_RUN_LIST_LIMIT: u32 = 200;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Backend base URL; empty or `None` means auto-detect
    pub api_base_override: Option<String>,
    pub poll_interval_ms: u32,
    pub run_list_limit: u32,
    /// Expand every node when a run is opened
    pub auto_expand: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            api_base_override: None,
            poll_interval_ms: 5_000,
            run_list_limit: 50,
            auto_expand: true,
        }
    }
}

impl DashboardSettings {
    pub fn normalized(mut self) -> Self {
        self.poll_interval_ms = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self.run_list_limit = self.run_list_limit.clamp(1, MAX_RUN_LIST_LIMIT);
        self.api_base_override = self
            .api_base_override
            .map(|base| base.trim().to_string())
            .filter(|base| !base.is_empty());
        self
    }

    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str::<Self>(raw)
            .map(Self::normalized)
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize settings: {e}"))
    }
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

pub fn load_settings() -> DashboardSettings {
    let Some(storage) = local_storage() else {
        return DashboardSettings::default();
    };
    let Ok(Some(raw)) = storage.get_item(SETTINGS_STORAGE_KEY) else {
        return DashboardSettings::default();
    };
    DashboardSettings::from_json(&raw)
}

pub fn persist_settings(settings: &DashboardSettings) -> Result<(), String> {
    let storage = local_storage().ok_or("LocalStorage not available")?;
    let raw = settings.clone().normalized().to_json()?;
    storage
        .set_item(SETTINGS_STORAGE_KEY, &raw)
        .map_err(|_| "Failed to set item in localStorage".to_string())
}

pub fn clear_settings() -> Result<(), String> {
    let storage = local_storage().ok_or("LocalStorage not available")?;
    storage
        .remove_item(SETTINGS_STORAGE_KEY)
        .map_err(|_| "Failed to remove item from localStorage".to_string())
}
