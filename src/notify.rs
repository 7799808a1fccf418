//! Update-request notification webhook.
//!
//! One POST per user action, best effort: a bounded timeout, no retry, and
//! any failure surfaces as a message instead of an error escaping to the
//! caller. The receiving pipeline — not this crate — appends the request log
//! entry, and only on successful delivery, so a failed send leaves
//! eligibility untouched.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// The observed delivery budget per click.
const WEBHOOK_TIMEOUT_SECS: u64 = 5;

/// Flat payload the webhook consumer expects. Keys are snake_case on the
/// wire; `timestamp` is ISO-8601 UTC.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequestPayload {
    pub project_name: String,
    pub facility: String,
    pub status: String,
    pub wo: String,
    pub sheet_link: String,
    pub timestamp: String,
}

impl UpdateRequestPayload {
    pub fn new(
        project_name: &str,
        facility: &str,
        status: &str,
        wo: &str,
        sheet_link: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            project_name: project_name.to_string(),
            facility: facility.to_string(),
            status: status.to_string(),
            wo: wo.to_string(),
            sheet_link: sheet_link.to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// POST the payload to the webhook. Exactly one attempt; timeout and
/// non-2xx responses come back as `Err(message)`.
pub async fn send_update_request(
    webhook_url: &str,
    payload: &UpdateRequestPayload,
) -> Result<(), String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("HTTP client error: {}", e))?;

    let resp = client
        .post(webhook_url)
        .json(payload)
        .send()
        .await
        .map_err(|e| format!("Update request not delivered: {}", e))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(format!(
            "Update request rejected: HTTP {} {}",
            status,
            body.chars().take(200).collect::<String>()
        ));
    }

    log::debug!(
        "Update request delivered for '{}' at '{}'",
        payload.project_name,
        payload.facility
    );
    Ok(())
}
