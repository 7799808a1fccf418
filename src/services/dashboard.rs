// Dashboard service — business logic for the filterable project view.
// Loads the tracker, derives filter options, applies the active selection,
// and annotates one card per project with update-request eligibility.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::request_log::{self, RequestLogEntry};
use crate::sheet;
use crate::state::FilterState;
use crate::throttle::{check_eligibility, Eligibility, IdentityKey};
use crate::tracker::{self, ProjectRecord};
use crate::types::Config;

/// Result type for dashboard loading.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResult {
    Success { data: DashboardData },
    Empty { message: String },
    Error { message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub stats: TrackerStats,
    pub state_options: Vec<String>,
    pub city_options: Vec<String>,
    pub facility_options: Vec<String>,
    pub cards: Vec<ProjectCard>,
    /// Degradation notice from the request-log read, if any. The view stays
    /// usable; only eligibility data is affected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_notice: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerStats {
    pub total_projects: usize,
    pub facilities: usize,
    pub cooling_down: usize,
}

/// One expander card: the project row plus its throttle state and the
/// recent requests shown alongside it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    #[serde(flatten)]
    pub project: ProjectRecord,
    pub eligibility: Eligibility,
    pub recent_requests: Vec<RequestLogEntry>,
}

/// Load and assemble the dashboard for the current filter selections.
pub async fn build_dashboard(config: &Config, filters: &FilterState) -> DashboardResult {
    let range = match sheet::load_range(&config.tracker_source, &config.tracker_sheet).await {
        Ok(range) => range,
        Err(message) => {
            log::warn!("Tracker unavailable: {}", message);
            return DashboardResult::Error { message };
        }
    };

    let records = tracker::decode_rows(range.rows());
    if records.is_empty() {
        return DashboardResult::Empty {
            message: "No projects with a facility and project name in the tracker.".to_string(),
        };
    }

    let now = Utc::now();
    let log = request_log::load_request_log(
        config.request_log_source.as_deref(),
        &config.request_log_sheet,
        now,
    )
    .await;

    let filtered = tracker::apply_filters(&records, filters, config.key_format);
    let cards = build_cards(&filtered, &log.entries, now);

    let cooling_down = cards
        .iter()
        .filter(|c| !c.eligibility.is_eligible())
        .count();

    DashboardResult::Success {
        data: DashboardData {
            stats: TrackerStats {
                total_projects: cards.len(),
                facilities: tracker::facility_options(&records).len(),
                cooling_down,
            },
            state_options: tracker::state_options(&records, config.key_format),
            city_options: tracker::city_options(&records, config.key_format),
            facility_options: tracker::facility_options(&records),
            cards,
            log_notice: log.notice,
        },
    }
}

/// One card per distinct project name; when duplicates exist the first
/// matching row wins. Eligibility and the recent-request list come from the
/// (project name, facility) identity.
pub fn build_cards(
    records: &[&ProjectRecord],
    entries: &[RequestLogEntry],
    now: DateTime<Utc>,
) -> Vec<ProjectCard> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cards = Vec::new();

    for record in records {
        if !seen.insert(record.project_name.trim().to_string()) {
            continue;
        }

        let key = IdentityKey {
            project_name: &record.project_name,
            facility: &record.facility,
        };
        let recent_requests: Vec<RequestLogEntry> = entries
            .iter()
            .filter(|e| {
                e.project_name.trim() == record.project_name.trim()
                    && e.facility.trim() == record.facility.trim()
            })
            .cloned()
            .collect();

        cards.push(ProjectCard {
            eligibility: check_eligibility(entries, key, now),
            recent_requests,
            project: (*record).clone(),
        });
    }

    cards
}
