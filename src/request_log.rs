//! Update-request log reader.
//!
//! Past "request an update" actions are appended to an external tabular
//! source by the notification pipeline; this crate only reads it. Entries
//! older than 14 days are dropped at read time (display retention); the
//! 7-day eligibility window is applied separately in `throttle`.
//!
//! The source being unreachable is never fatal: the reader degrades to an
//! empty, correctly-shaped table plus a notice string for the UI.

use calamine::Data;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::sheet::{self, cell_at};

/// Column header of the request log source, in order.
pub const LOG_HEADER: [&str; 5] = ["Project Name", "WO#", "Facility", "Status", "Timestamp"];

/// Entries older than this are not shown at all.
pub const RETENTION_DAYS: i64 = 14;

/// One prior update request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLogEntry {
    pub project_name: String,
    pub wo: String,
    pub facility: String,
    pub status: String,
    /// None when the source row carried no parseable timestamp. Such entries
    /// never count as "recent" (a malformed record must not lock anyone out).
    pub timestamp: Option<DateTime<Utc>>,
}

/// Result of reading the log: entries plus an optional degradation notice.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    pub entries: Vec<RequestLogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Read the request log from its configured source.
///
/// `source = None` (log not configured) and fetch failures both yield an
/// empty log; only the failure case carries a notice.
pub async fn load_request_log(source: Option<&str>, sheet_name: &str, now: DateTime<Utc>) -> RequestLog {
    let Some(source) = source else {
        return RequestLog::default();
    };

    match sheet::load_range(source, sheet_name).await {
        Ok(range) => {
            let entries = decode_log_rows(range.rows(), now);
            RequestLog {
                entries,
                notice: None,
            }
        }
        Err(e) => {
            log::warn!("Request log unavailable: {}", e);
            RequestLog {
                entries: Vec::new(),
                notice: Some(format!("Update-request history unavailable: {}", e)),
            }
        }
    }
}

/// Decode raw rows into entries, skipping the header row and anything
/// outside the retention window.
pub fn decode_log_rows<'a, I>(rows: I, now: DateTime<Utc>) -> Vec<RequestLogEntry>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let cutoff = now - chrono::Duration::days(RETENTION_DAYS);
    let mut rows = rows.into_iter().peekable();
    // Hand-maintained copies of the log sometimes lack the header row; only
    // skip the first row when it actually is one.
    if rows.peek().is_some_and(|row| is_header_row(row)) {
        rows.next();
    }
    rows.filter_map(|row| {
        let entry = RequestLogEntry {
            project_name: cell_at(row, 0),
            wo: cell_at(row, 1),
            facility: cell_at(row, 2),
            status: cell_at(row, 3),
            timestamp: parse_timestamp(&cell_at(row, 4)),
        };
        if entry.project_name.is_empty() && entry.facility.is_empty() {
            return None;
        }
        // Unparseable timestamps stay visible; only confirmed-old rows drop.
        match entry.timestamp {
            Some(ts) if ts < cutoff => None,
            _ => Some(entry),
        }
    })
    .collect()
}

/// True when a row is the log's column header rather than data.
fn is_header_row(row: &[Data]) -> bool {
    LOG_HEADER
        .iter()
        .enumerate()
        .all(|(i, name)| cell_at(row, i).eq_ignore_ascii_case(name))
}

/// Parse a log timestamp permissively. Observed shapes: RFC 3339 (what the
/// notification pipeline writes), plain `YYYY-MM-DD HH:MM:SS`, and US-style
/// `MM/DD/YYYY HH:MM[:SS]` from hand-edited rows.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(project: &str, wo: &str, facility: &str, status: &str, ts: &str) -> Vec<Data> {
        vec![
            Data::String(project.into()),
            Data::String(wo.into()),
            Data::String(facility.into()),
            Data::String(status.into()),
            Data::String(ts.into()),
        ]
    }

    fn header() -> Vec<Data> {
        LOG_HEADER.iter().map(|h| Data::String((*h).into())).collect()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-08-24T09:30:00Z").is_some());
        assert!(parse_timestamp("2026-08-24T09:30:00+00:00").is_some());
        assert!(parse_timestamp("2026-08-24 09:30:00").is_some());
        assert!(parse_timestamp("08/24/2026 09:30:00").is_some());
        assert!(parse_timestamp("08/24/2026 09:30").is_some());
    }

    #[test]
    fn test_parse_timestamp_garbage_is_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("24-08-2026"), None);
    }

    #[test]
    fn test_decode_skips_header_and_old_entries() {
        let now = Utc::now();
        let fresh = (now - Duration::days(2)).to_rfc3339();
        let stale = (now - Duration::days(20)).to_rfc3339();

        let rows = vec![
            header(),
            row("Roof Repair", "4411", "CA_Oakland_5333 Adeline St", "P1", &fresh),
            row("Old Paint Job", "1002", "CA_Oakland_5333 Adeline St", "P2", &stale),
        ];
        let refs: Vec<&[Data]> = rows.iter().map(|r| r.as_slice()).collect();

        let entries = decode_log_rows(refs, now);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].project_name, "Roof Repair");
        assert_eq!(entries[0].wo, "4411");
    }

    #[test]
    fn test_decode_without_header_keeps_first_row() {
        let now = Utc::now();
        let fresh = (now - Duration::days(1)).to_rfc3339();
        let rows = vec![row("Roof Repair", "4411", "CA_Oakland_5333 Adeline St", "P1", &fresh)];
        let refs: Vec<&[Data]> = rows.iter().map(|r| r.as_slice()).collect();

        let entries = decode_log_rows(refs, now);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].project_name, "Roof Repair");
    }

    #[test]
    fn test_decode_keeps_unparseable_timestamp_rows() {
        let now = Utc::now();
        let rows = vec![
            header(),
            row("Roof Repair", "4411", "CA_Oakland_5333 Adeline St", "P1", "not a date"),
        ];
        let refs: Vec<&[Data]> = rows.iter().map(|r| r.as_slice()).collect();

        let entries = decode_log_rows(refs, now);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].timestamp, None);
    }

    #[test]
    fn test_decode_drops_blank_rows() {
        let now = Utc::now();
        let rows = vec![header(), row("", "", "", "", "")];
        let refs: Vec<&[Data]> = rows.iter().map(|r| r.as_slice()).collect();
        assert!(decode_log_rows(refs, now).is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_is_empty_without_notice() {
        let log = load_request_log(None, "Log", Utc::now()).await;
        assert!(log.entries.is_empty());
        assert!(log.notice.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_source_degrades_with_notice() {
        let log = load_request_log(Some("/nonexistent/log.xlsx"), "Log", Utc::now()).await;
        assert!(log.entries.is_empty());
        assert!(log.notice.is_some());
    }
}
