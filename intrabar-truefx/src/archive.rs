//! Archive naming and extraction.
//!
//! TrueFX publishes one zip per currency pair and month, each holding a single
//! CSV named after the archive.

use std::io::{Cursor, Read};

use chrono::{Datelike, Month, NaiveDate};
use zip::ZipArchive;

use intrabar_core::IntrabarError;

/// Root of the public archive tree.
pub const DEFAULT_BASE_URL: &str = "http://www.truefx.com/dev/data";

/// `"AUD/USD"` and `"audusd"` both become `"AUDUSD"`.
#[must_use]
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| *c != '/')
        .collect::<String>()
        .to_ascii_uppercase()
}

fn month_name(month: u32) -> Result<String, IntrabarError> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_ascii_uppercase())
        .ok_or_else(|| IntrabarError::InvalidArg(format!("month out of range: {month}")))
}

/// Location of the archive for one symbol and month.
///
/// # Errors
/// Returns `InvalidArg` when `month` is not in `1..=12`.
pub fn archive_url(
    base: &str,
    symbol: &str,
    year: i32,
    month: u32,
) -> Result<String, IntrabarError> {
    let name = month_name(month)?;
    let base = base.trim_end_matches('/');
    Ok(format!("{base}/{year}/{name}-{year}/{symbol}-{year}-{month:02}.zip"))
}

/// Name of the CSV entry inside an archive.
#[must_use]
pub fn csv_filename(symbol: &str, year: i32, month: u32) -> String {
    format!("{symbol}-{year}-{month:02}.csv")
}

/// Read a CSV entry out of an in-memory archive.
///
/// Prefers the entry called `filename` and falls back to the first entry.
///
/// # Errors
/// Returns `Data` for unreadable or empty archives and non-UTF-8 content.
pub fn extract_csv(bytes: &[u8], filename: &str) -> Result<String, IntrabarError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IntrabarError::Data(format!("bad archive: {e}")))?;
    if archive.len() == 0 {
        return Err(IntrabarError::Data("empty archive".to_string()));
    }

    let index = archive.index_for_name(filename).unwrap_or(0);
    let mut entry = archive
        .by_index(index)
        .map_err(|e| IntrabarError::Data(format!("bad archive entry: {e}")))?;
    let mut content = String::new();
    entry
        .read_to_string(&mut content)
        .map_err(|e| IntrabarError::Data(format!("reading {}: {e}", entry.name())))?;
    Ok(content)
}

/// Every `(year, month)` touched by the inclusive range, in order.
#[must_use]
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut out = Vec::new();
    let (mut y, mut m) = (start.year(), start.month());
    while (y, m) <= (end.year(), end.month()) {
        out.push((y, m));
        if m == 12 {
            y += 1;
            m = 1;
        } else {
            m += 1;
        }
    }
    out
}
