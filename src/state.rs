//! Session state and configuration loading.
//!
//! `FilterState` is the one piece of interaction-scoped mutable state: the
//! current dropdown selections. It is an explicit struct handed into the
//! filter/view functions — no ambient globals — with a `reset()` that
//! restores the defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::Config;

/// Sentinel meaning "no selection" for a filter axis, mirroring the
/// dropdown's default entry.
pub const ALL: &str = "All";

/// Current dropdown selections. `ALL` (or empty) on an axis means that axis
/// is not filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub state: String,
    pub city: String,
    pub facility: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            state: ALL.to_string(),
            city: ALL.to_string(),
            facility: ALL.to_string(),
        }
    }
}

impl FilterState {
    /// Restore the default ("All") selections.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    pub fn state_selection(&self) -> Option<&str> {
        selection(&self.state)
    }

    pub fn city_selection(&self) -> Option<&str> {
        selection(&self.city)
    }

    pub fn facility_selection(&self) -> Option<&str> {
        selection(&self.facility)
    }
}

fn selection(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ALL {
        None
    } else {
        Some(trimmed)
    }
}

/// Canonical config file path (~/.facilityos/config.json).
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".facilityos").join("config.json"))
}

/// Load configuration from ~/.facilityos/config.json.
pub fn load_config() -> Result<Config, String> {
    let path = config_path()?;

    if !path.exists() {
        return Err(format!(
            "Config file not found at {}. Create it with: {{ \"trackerSource\": \"/path/to/tracker.xlsx\" }}",
            path.display()
        ));
    }

    let content =
        fs::read_to_string(&path).map_err(|e| format!("Failed to read config: {}", e))?;

    let config: Config =
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))?;

    if config.tracker_source.trim().is_empty() {
        return Err("trackerSource must not be empty".to_string());
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_select_nothing() {
        let filters = FilterState::default();
        assert_eq!(filters.state_selection(), None);
        assert_eq!(filters.city_selection(), None);
        assert_eq!(filters.facility_selection(), None);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut filters = FilterState {
            state: "CA".to_string(),
            city: "Oakland".to_string(),
            facility: "CA_Oakland_5333 Adeline St".to_string(),
        };
        filters.reset();
        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn test_selection_treats_blank_as_all() {
        let filters = FilterState {
            state: "  ".to_string(),
            city: "Oakland".to_string(),
            facility: ALL.to_string(),
        };
        assert_eq!(filters.state_selection(), None);
        assert_eq!(filters.city_selection(), Some("Oakland"));
        assert_eq!(filters.facility_selection(), None);
    }
}
