//! Tabular source access.
//!
//! The project tracker and the update-request log both live in xlsx
//! workbooks, reachable either as a local path or an HTTP(S) URL. Either way
//! the bytes are pulled into memory and handed to calamine; callers get a
//! positional `Range<Data>` and decode it with a fixed column schema.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use calamine::{Data, Range, Reader, Xlsx};

/// Bound on the workbook fetch. A slow tracker source degrades one section
/// of the view, it must not hang the whole interaction.
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Load a worksheet from a local path or HTTP(S) URL.
///
/// Errors are plain strings: the caller decides whether the section degrades
/// to an empty view or surfaces the message.
pub async fn load_range(source: &str, sheet_name: &str) -> Result<Range<Data>, String> {
    let bytes = if is_url(source) {
        fetch_bytes(source).await?
    } else {
        read_file_bytes(Path::new(source))?
    };

    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| format!("Failed to open workbook {}: {}", source, e))?;

    workbook
        .worksheet_range(sheet_name)
        .map_err(|e| format!("Sheet '{}' not readable in {}: {}", sheet_name, source, e))
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_file_bytes(path: &Path) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(|e| format!("HTTP client error: {}", e))?;

    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("Fetch failed for {}: {}", url, e))?;

    if !resp.status().is_success() {
        return Err(format!("Fetch failed for {}: HTTP {}", url, resp.status()));
    }

    resp.bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| format!("Fetch failed for {}: {}", url, e))
}

/// Render any cell as display text. Empty cells become empty strings.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => {
            // Whole-number floats (WO numbers, costs) print without ".0".
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                format!("{}", f)
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({:?})", e),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ndt| ndt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Cell at `index`, as display text; out-of-range reads as empty.
pub fn cell_at(row: &[Data], index: usize) -> String {
    row.get(index).map(cell_to_string).unwrap_or_default()
}
