//! Update-request throttling.
//!
//! A project+facility identity may request an update at most once per 7-day
//! window. The window is derived purely from the external request log and
//! the wall clock; nothing is persisted here. Per identity there are exactly
//! two observable states: `Eligible` and `CoolingDown { available_at }`.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::request_log::RequestLogEntry;

/// Cooldown between update requests for the same identity.
pub const COOLDOWN_DAYS: i64 = 7;

/// Identity used to match log entries: project name + facility key.
/// Both sides of every comparison are trimmed.
#[derive(Debug, Clone, Copy)]
pub struct IdentityKey<'a> {
    pub project_name: &'a str,
    pub facility: &'a str,
}

impl IdentityKey<'_> {
    fn matches(&self, entry: &RequestLogEntry) -> bool {
        entry.project_name.trim() == self.project_name.trim()
            && entry.facility.trim() == self.facility.trim()
    }
}

/// Throttle state for one identity at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Eligibility {
    Eligible,
    #[serde(rename_all = "camelCase")]
    CoolingDown {
        available_at: DateTime<Utc>,
        days_remaining: i64,
    },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Decide whether a new update request is allowed at `now`.
///
/// Matching entries with a timestamp inside the cooldown window block the
/// request; `available_at` comes off the most recent one. Entries without a
/// parseable timestamp never block (fail open toward eligible — a malformed
/// record must not permanently lock out a legitimate request).
pub fn check_eligibility(
    entries: &[RequestLogEntry],
    key: IdentityKey<'_>,
    now: DateTime<Utc>,
) -> Eligibility {
    let window_start = now - Duration::days(COOLDOWN_DAYS);

    // Strictly inside the window: an entry aged exactly 7 days no longer
    // blocks, so `available_at = timestamp + 7 days` is the first eligible
    // instant, not the last blocked one.
    let latest_recent = entries
        .iter()
        .filter(|e| key.matches(e))
        .filter_map(|e| e.timestamp)
        .filter(|ts| *ts > window_start)
        .max();

    match latest_recent {
        Some(ts) => {
            let available_at = ts + Duration::days(COOLDOWN_DAYS);
            Eligibility::CoolingDown {
                available_at,
                days_remaining: days_remaining(available_at, now),
            }
        }
        None => Eligibility::Eligible,
    }
}

/// Whole days until `available_at`, rounded up, never negative.
fn days_remaining(available_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (available_at - now).num_seconds();
    if secs <= 0 {
        return 0;
    }
    (secs + 86_399) / 86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACILITY: &str = "CA_Oakland_5333 Adeline St";

    fn entry(project: &str, facility: &str, ts: Option<DateTime<Utc>>) -> RequestLogEntry {
        RequestLogEntry {
            project_name: project.to_string(),
            wo: "4411".to_string(),
            facility: facility.to_string(),
            status: "P1".to_string(),
            timestamp: ts,
        }
    }

    fn key(project: &str) -> IdentityKey<'_> {
        IdentityKey {
            project_name: project,
            facility: FACILITY,
        }
    }

    #[test]
    fn test_recent_request_blocks() {
        let now = Utc::now();
        let sent = now - Duration::days(3);
        let entries = vec![entry("Roof Repair", FACILITY, Some(sent))];

        match check_eligibility(&entries, key("Roof Repair"), now) {
            Eligibility::CoolingDown {
                available_at,
                days_remaining,
            } => {
                assert_eq!(available_at, sent + Duration::days(7));
                assert_eq!(days_remaining, 4);
            }
            Eligibility::Eligible => panic!("expected cooldown"),
        }
    }

    #[test]
    fn test_old_request_does_not_block() {
        let now = Utc::now();
        let entries = vec![entry("Roof Repair", FACILITY, Some(now - Duration::days(7)))];
        assert!(check_eligibility(&entries, key("Roof Repair"), now).is_eligible());
    }

    #[test]
    fn test_cooldown_boundary_is_exact() {
        let now = Utc::now();
        let just_inside = now - Duration::days(7) + Duration::seconds(1);
        let entries = vec![entry("Roof Repair", FACILITY, Some(just_inside))];
        assert!(!check_eligibility(&entries, key("Roof Repair"), now).is_eligible());

        let at_boundary = now - Duration::days(7);
        let entries = vec![entry("Roof Repair", FACILITY, Some(at_boundary))];
        assert!(check_eligibility(&entries, key("Roof Repair"), now).is_eligible());
    }

    #[test]
    fn test_available_at_uses_most_recent_match() {
        let now = Utc::now();
        let older = now - Duration::days(6);
        let newer = now - Duration::days(2);
        let entries = vec![
            entry("Roof Repair", FACILITY, Some(older)),
            entry("Roof Repair", FACILITY, Some(newer)),
        ];

        match check_eligibility(&entries, key("Roof Repair"), now) {
            Eligibility::CoolingDown { available_at, .. } => {
                assert_eq!(available_at, newer + Duration::days(7));
            }
            Eligibility::Eligible => panic!("expected cooldown"),
        }
    }

    #[test]
    fn test_other_identities_do_not_block() {
        let now = Utc::now();
        let recent = Some(now - Duration::days(1));
        let entries = vec![
            entry("Roof Repair", "WA_Seattle_Pier 56", recent),
            entry("Paint Refresh", FACILITY, recent),
        ];
        assert!(check_eligibility(&entries, key("Roof Repair"), now).is_eligible());
    }

    #[test]
    fn test_missing_timestamp_fails_open() {
        let now = Utc::now();
        let entries = vec![entry("Roof Repair", FACILITY, None)];
        assert!(check_eligibility(&entries, key("Roof Repair"), now).is_eligible());
    }

    #[test]
    fn test_identity_match_trims_whitespace() {
        let now = Utc::now();
        let entries = vec![entry("  Roof Repair ", &format!(" {} ", FACILITY), Some(now))];
        let k = IdentityKey {
            project_name: "Roof Repair",
            facility: FACILITY,
        };
        assert!(!check_eligibility(&entries, k, now).is_eligible());
    }

    #[test]
    fn test_empty_log_is_eligible() {
        assert!(check_eligibility(&[], key("Roof Repair"), Utc::now()).is_eligible());
    }

    #[test]
    fn test_days_remaining_rounds_up() {
        let now = Utc::now();
        assert_eq!(days_remaining(now + Duration::hours(1), now), 1);
        assert_eq!(days_remaining(now + Duration::days(3) + Duration::hours(2), now), 4);
        assert_eq!(days_remaining(now - Duration::hours(1), now), 0);
    }
}
