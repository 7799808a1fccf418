//! Project tracker store.
//!
//! The tracker sheet is consumed positionally: a fixed index-to-field schema
//! is applied once at load time and everything downstream works with typed
//! `ProjectRecord`s. Columns 11-19 are intentionally unmapped. The sheet
//! starts with a title row, then the header row; data begins at row index 2.
//!
//! Rows without a Facility or Project Name are excluded entirely, not just
//! blanked. Dates parse permissively and re-serialize as MM/DD/YYYY;
//! unparseable dates become empty strings, never errors.

use calamine::Data;
use chrono::NaiveDate;
use serde::Serialize;

use crate::facility::{FacilityKey, KeyFormat};
use crate::sheet::{cell_at, cell_to_string};
use crate::state::FilterState;

/// Title row + header row precede the data.
const LEADING_NON_DATA_ROWS: usize = 2;

// ============================================================================
// Status codes
// ============================================================================

/// Project status code from column 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusCode {
    P0,
    P1,
    P2,
    P3,
    Complete,
    Other(String),
}

impl StatusCode {
    pub fn parse(raw: &str) -> StatusCode {
        match raw.trim() {
            "P0" => StatusCode::P0,
            "P1" => StatusCode::P1,
            "P2" => StatusCode::P2,
            "P3" => StatusCode::P3,
            "Complete" | "COMPLETE" | "complete" => StatusCode::Complete,
            other => StatusCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusCode::P0 => "P0",
            StatusCode::P1 => "P1",
            StatusCode::P2 => "P2",
            StatusCode::P3 => "P3",
            StatusCode::Complete => "Complete",
            StatusCode::Other(raw) => raw,
        }
    }
}

impl Serialize for StatusCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Column schema
// ============================================================================

/// Named tracker fields, in sheet order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Status,
    Phase,
    RecentUpdate,
    Region,
    Facility,
    ProjectName,
    Wo,
    CreationDate,
    InitialWorkDate,
    ExpectedCompletionDate,
    Summary,
    EstCost,
    ProjectCode,
    ApprovedCost,
    EstStart,
    ActualStart,
    EstCompletion,
    ActualCompletion,
    ActualCost,
    CompletionStatus,
    CompletionPhotos,
}

/// How a column's cells are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decode {
    Text,
    Date,
}

/// The positional column map. Indices and gaps (11-19 skipped) mirror the
/// source sheet exactly and must be preserved.
const SCHEMA: &[(usize, Field, Decode)] = &[
    (0, Field::Status, Decode::Text),
    (1, Field::Phase, Decode::Text),
    (2, Field::RecentUpdate, Decode::Text),
    (3, Field::Region, Decode::Text),
    (4, Field::Facility, Decode::Text),
    (5, Field::ProjectName, Decode::Text),
    (6, Field::Wo, Decode::Text),
    (7, Field::CreationDate, Decode::Date),
    (8, Field::InitialWorkDate, Decode::Date),
    (9, Field::ExpectedCompletionDate, Decode::Date),
    (10, Field::Summary, Decode::Text),
    (20, Field::EstCost, Decode::Text),
    (21, Field::ProjectCode, Decode::Text),
    (22, Field::ApprovedCost, Decode::Text),
    (23, Field::EstStart, Decode::Date),
    (24, Field::ActualStart, Decode::Date),
    (25, Field::EstCompletion, Decode::Date),
    (26, Field::ActualCompletion, Decode::Date),
    (27, Field::ActualCost, Decode::Text),
    (28, Field::CompletionStatus, Decode::Text),
    (29, Field::CompletionPhotos, Decode::Text),
];

// ============================================================================
// Records
// ============================================================================

/// One tracker row, fully decoded. Date fields hold MM/DD/YYYY or "".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub status: String,
    pub phase: String,
    pub recent_update: String,
    pub region: String,
    pub facility: String,
    pub project_name: String,
    pub wo: String,
    pub creation_date: String,
    pub initial_work_date: String,
    pub expected_completion_date: String,
    pub summary: String,
    pub est_cost: String,
    pub project_code: String,
    pub approved_cost: String,
    pub est_start: String,
    pub actual_start: String,
    pub est_completion: String,
    pub actual_completion: String,
    pub actual_cost: String,
    pub completion_status: String,
    pub completion_photos: String,
}

impl ProjectRecord {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::parse(&self.status)
    }

    /// Parsed facility key for filter derivation.
    pub fn facility_key(&self, format: KeyFormat) -> FacilityKey {
        FacilityKey::parse(&self.facility, format)
    }
}

/// Decode one data row through the schema. `None` when Facility or Project
/// Name is missing — those rows are excluded from the store entirely.
pub fn decode_row(row: &[Data]) -> Option<ProjectRecord> {
    let mut record = ProjectRecord::default();

    for (index, field, decode) in SCHEMA {
        let value = match decode {
            Decode::Text => cell_at(row, *index),
            Decode::Date => format_date_cell(row.get(*index)),
        };
        *field_slot(&mut record, *field) = value;
    }

    if record.facility.is_empty() || record.project_name.is_empty() {
        return None;
    }
    Some(record)
}

fn field_slot(record: &mut ProjectRecord, field: Field) -> &mut String {
    match field {
        Field::Status => &mut record.status,
        Field::Phase => &mut record.phase,
        Field::RecentUpdate => &mut record.recent_update,
        Field::Region => &mut record.region,
        Field::Facility => &mut record.facility,
        Field::ProjectName => &mut record.project_name,
        Field::Wo => &mut record.wo,
        Field::CreationDate => &mut record.creation_date,
        Field::InitialWorkDate => &mut record.initial_work_date,
        Field::ExpectedCompletionDate => &mut record.expected_completion_date,
        Field::Summary => &mut record.summary,
        Field::EstCost => &mut record.est_cost,
        Field::ProjectCode => &mut record.project_code,
        Field::ApprovedCost => &mut record.approved_cost,
        Field::EstStart => &mut record.est_start,
        Field::ActualStart => &mut record.actual_start,
        Field::EstCompletion => &mut record.est_completion,
        Field::ActualCompletion => &mut record.actual_completion,
        Field::ActualCost => &mut record.actual_cost,
        Field::CompletionStatus => &mut record.completion_status,
        Field::CompletionPhotos => &mut record.completion_photos,
    }
}

/// Decode all data rows (title + header skipped).
pub fn decode_rows<'a, I>(rows: I) -> Vec<ProjectRecord>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    rows.into_iter()
        .skip(LEADING_NON_DATA_ROWS)
        .filter_map(decode_row)
        .collect()
}

// ============================================================================
// Dates
// ============================================================================

/// Decode a date cell to MM/DD/YYYY. Native xlsx datetimes convert directly;
/// text falls back to permissive parsing. Anything unparseable is "".
fn format_date_cell(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::DateTime(dt)) => dt
            .as_datetime()
            .map(|ndt| ndt.date().format("%m/%d/%Y").to_string())
            .unwrap_or_default(),
        Some(other) => format_date_string(&cell_to_string(other)),
        None => String::new(),
    }
}

/// Permissive text-date parse, re-serialized as MM/DD/YYYY; "" on failure.
pub fn format_date_string(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    // A datetime's date portion is enough.
    let date_part = raw.split_whitespace().next().unwrap_or(raw);
    let date_part = date_part.split('T').next().unwrap_or(date_part);

    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"];
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, fmt) {
            return date.format("%m/%d/%Y").to_string();
        }
    }

    String::new()
}

// ============================================================================
// Filtering
// ============================================================================

/// Apply the active filters. Precedence: facility > city > state. The most
/// specific selection wins and the broader ones are ignored, never AND-ed.
pub fn apply_filters<'a>(
    records: &'a [ProjectRecord],
    filters: &FilterState,
    format: KeyFormat,
) -> Vec<&'a ProjectRecord> {
    if let Some(facility) = filters.facility_selection() {
        return records
            .iter()
            .filter(|r| r.facility.trim() == facility.trim())
            .collect();
    }
    if let Some(city) = filters.city_selection() {
        return records
            .iter()
            .filter(|r| r.facility_key(format).city.trim() == city.trim())
            .collect();
    }
    if let Some(state) = filters.state_selection() {
        return records
            .iter()
            .filter(|r| r.facility_key(format).state.trim() == state.trim())
            .collect();
    }
    records.iter().collect()
}

/// Distinct sorted facility keys for the dropdown.
pub fn facility_options(records: &[ProjectRecord]) -> Vec<String> {
    distinct_sorted(records.iter().map(|r| r.facility.clone()))
}

/// Distinct sorted cities derived from parsed facility keys.
pub fn city_options(records: &[ProjectRecord], format: KeyFormat) -> Vec<String> {
    distinct_sorted(records.iter().map(|r| r.facility_key(format).city))
}

/// Distinct sorted states derived from parsed facility keys.
pub fn state_options(records: &[ProjectRecord], format: KeyFormat) -> Vec<String> {
    distinct_sorted(records.iter().map(|r| r.facility_key(format).state))
}

fn distinct_sorted(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = values.filter(|v| !v.is_empty()).collect();
    out.sort();
    out.dedup();
    out
}
