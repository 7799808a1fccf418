// Update-request service. Re-checks eligibility against a fresh log read
// immediately before sending, so a stale dashboard can't bypass the
// cooldown, then delivers the webhook. A failed send changes nothing: the
// log entry is appended by the receiving pipeline only on success.

use chrono::Utc;
use serde::Serialize;

use crate::notify::{self, UpdateRequestPayload};
use crate::request_log;
use crate::sheet;
use crate::throttle::{check_eligibility, Eligibility, IdentityKey};
use crate::tracker::{self, ProjectRecord};
use crate::types::Config;

/// Result type for the "request an update" action.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RequestOutcome {
    #[serde(rename_all = "camelCase")]
    Sent {
        project_name: String,
        facility: String,
    },
    #[serde(rename_all = "camelCase")]
    CoolingDown {
        available_at: chrono::DateTime<Utc>,
        days_remaining: i64,
    },
    Failed {
        message: String,
    },
}

/// Submit an update request for a project, optionally pinned to a facility
/// (needed when the same project name appears at several facilities).
pub async fn submit_update_request(
    config: &Config,
    project_name: &str,
    facility: Option<&str>,
) -> RequestOutcome {
    let Some(webhook_url) = config.webhook_url.as_deref() else {
        return RequestOutcome::Failed {
            message: "No webhook configured (webhookUrl).".to_string(),
        };
    };

    let range = match sheet::load_range(&config.tracker_source, &config.tracker_sheet).await {
        Ok(range) => range,
        Err(message) => return RequestOutcome::Failed { message },
    };
    let records = tracker::decode_rows(range.rows());

    let Some(record) = find_record(&records, project_name, facility) else {
        return RequestOutcome::Failed {
            message: format!("Project '{}' not found in the tracker.", project_name),
        };
    };

    // Fresh read: the dashboard's copy may predate another session's request.
    let now = Utc::now();
    let log = request_log::load_request_log(
        config.request_log_source.as_deref(),
        &config.request_log_sheet,
        now,
    )
    .await;

    let key = IdentityKey {
        project_name: &record.project_name,
        facility: &record.facility,
    };
    if let Eligibility::CoolingDown {
        available_at,
        days_remaining,
    } = check_eligibility(&log.entries, key, now)
    {
        return RequestOutcome::CoolingDown {
            available_at,
            days_remaining,
        };
    }

    let payload = UpdateRequestPayload::new(
        &record.project_name,
        &record.facility,
        &record.status,
        &record.wo,
        config.sheet_link.as_deref().unwrap_or_default(),
        now,
    );

    match notify::send_update_request(webhook_url, &payload).await {
        Ok(()) => RequestOutcome::Sent {
            project_name: record.project_name.clone(),
            facility: record.facility.clone(),
        },
        Err(message) => RequestOutcome::Failed { message },
    }
}

/// First record matching the trimmed project name (and facility, when
/// given). Duplicate identities: first row wins.
fn find_record<'a>(
    records: &'a [ProjectRecord],
    project_name: &str,
    facility: Option<&str>,
) -> Option<&'a ProjectRecord> {
    records.iter().find(|r| {
        r.project_name.trim() == project_name.trim()
            && facility
                .map(|f| r.facility.trim() == f.trim())
                .unwrap_or(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(project: &str, facility: &str) -> ProjectRecord {
        ProjectRecord {
            project_name: project.to_string(),
            facility: facility.to_string(),
            ..ProjectRecord::default()
        }
    }

    #[test]
    fn test_find_record_by_name() {
        let records = vec![
            record("Roof Repair", "CA_Oakland_5333 Adeline St"),
            record("Paint Refresh", "WA_Seattle_Pier 56"),
        ];
        let hit = find_record(&records, " Roof Repair ", None).unwrap();
        assert_eq!(hit.facility, "CA_Oakland_5333 Adeline St");
        assert!(find_record(&records, "Unknown", None).is_none());
    }

    #[test]
    fn test_find_record_pins_facility() {
        let records = vec![
            record("Roof Repair", "CA_Oakland_5333 Adeline St"),
            record("Roof Repair", "WA_Seattle_Pier 56"),
        ];
        let hit = find_record(&records, "Roof Repair", Some("WA_Seattle_Pier 56")).unwrap();
        assert_eq!(hit.facility, "WA_Seattle_Pier 56");
    }

    #[tokio::test]
    async fn test_missing_webhook_is_failed_not_panic() {
        let config: Config =
            serde_json::from_str(r#"{ "trackerSource": "/nonexistent/tracker.xlsx" }"#).unwrap();
        match submit_update_request(&config, "Roof Repair", None).await {
            RequestOutcome::Failed { message } => assert!(message.contains("webhook")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
