//! Configuration types.
//!
//! Loaded from `~/.facilityos/config.json` (camelCase JSON). Secrets —
//! webhook URL, ticket API credentials — live only in this file; the core
//! modules receive them through `Config` and never hard-code them.

use serde::{Deserialize, Serialize};

use crate::facility::KeyFormat;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Tracker workbook: local path or HTTP(S) URL.
    pub tracker_source: String,
    /// Worksheet holding the tracker table.
    #[serde(default = "default_tracker_sheet")]
    pub tracker_sheet: String,
    /// Update-request log workbook; absent means no request history.
    #[serde(default)]
    pub request_log_source: Option<String>,
    /// Worksheet holding the request log.
    #[serde(default = "default_log_sheet")]
    pub request_log_sheet: String,
    /// Webhook for "request an update" notifications.
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Human-facing tracker link included in webhook payloads.
    #[serde(default)]
    pub sheet_link: Option<String>,
    /// Facility key delimiter convention for this deployment.
    #[serde(default)]
    pub key_format: KeyFormat,
    /// Ticketing API; absent disables the work-order overlay.
    #[serde(default)]
    pub tickets: Option<TicketsConfig>,
}

fn default_tracker_sheet() -> String {
    "Project Tracker".to_string()
}

fn default_log_sheet() -> String {
    "Update Requests".to_string()
}

/// Ticketing API settings. Which grant the token endpoint expects is
/// deployment configuration, not a protocol choice baked into the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketsConfig {
    pub base_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub grant_type: GrantType,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum GrantType {
    #[default]
    ClientCredentials,
    Password,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "trackerSource": "/data/tracker.xlsx" }"#).unwrap();
        assert_eq!(config.tracker_sheet, "Project Tracker");
        assert_eq!(config.request_log_sheet, "Update Requests");
        assert_eq!(config.key_format, KeyFormat::Underscore);
        assert!(config.tickets.is_none());
        assert!(config.webhook_url.is_none());
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = serde_json::from_str(
            r#"{
                "trackerSource": "https://example.com/tracker.xlsx",
                "trackerSheet": "West",
                "requestLogSource": "/data/log.xlsx",
                "webhookUrl": "https://hooks.example.com/abc",
                "sheetLink": "https://docs.example.com/tracker",
                "keyFormat": "hyphenated",
                "tickets": {
                    "baseUrl": "https://api.tickets.example.com",
                    "tokenUrl": "https://api.tickets.example.com/oauth/token",
                    "clientId": "id",
                    "clientSecret": "secret",
                    "grantType": "password",
                    "username": "svc",
                    "password": "pw"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.key_format, KeyFormat::Hyphenated);
        let tickets = config.tickets.unwrap();
        assert_eq!(tickets.grant_type, GrantType::Password);
        assert_eq!(tickets.page_size, 100);
    }
}
