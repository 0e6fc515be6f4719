use std::str::FromStr;

use intrabar_core::{Decimal, RawRow};

/// 2016-02-19 14:30:00 UTC, the regular-session open.
const SESSION_OPEN: i64 = 1_455_892_200;
/// 2016-02-22 14:30:00 UTC, the next session.
const NEXT_SESSION_OPEN: i64 = 1_456_151_400;

/// Raw encoded rows as a provider would return them.
pub fn by_symbol(s: &str) -> Option<Vec<RawRow>> {
    let anchor = format!("a{SESSION_OPEN}");
    let next = format!("a{NEXT_SESSION_OPEN}");
    match s {
        "GOOG" => Some(build(&[
            (anchor.as_str(), "700.20", "701.00", "700.10", "700.50", 12_345),
            ("1", "700.50", "700.90", "700.40", "700.60", 2_300),
            ("2", "700.60", "700.80", "700.00", "700.10", 900),
            ("4", "700.10", "700.30", "699.50", "699.80", 4_100),
            (next.as_str(), "702.00", "703.50", "701.80", "703.10", 15_002),
            ("1", "703.10", "703.20", "702.60", "702.90", 3_050),
        ])),
        "AAPL" => Some(build(&[
            (anchor.as_str(), "96.00", "96.40", "95.90", "96.30", 80_000),
            ("1", "96.30", "96.50", "96.20", "96.45", 41_000),
            ("2", "96.45", "96.60", "96.10", "96.15", 39_500),
            ("3", "96.15", "96.25", "95.95", "96.05", 36_000),
        ])),
        "MSFT" => Some(build(&[
            (anchor.as_str(), "51.80", "51.95", "51.70", "51.90", 60_000),
            ("1", "51.90", "52.00", "51.85", "51.95", 22_000),
            ("2", "51.95", "52.10", "51.90", "52.05", 25_000),
        ])),
        // Offset before any anchor.
        "BROKEN" => Some(build(&[
            ("3", "10", "10", "10", "10", 1),
            (anchor.as_str(), "10", "10", "10", "10", 1),
        ])),
        // Date token that is neither form.
        "GARBLED" => Some(build(&[
            (anchor.as_str(), "10", "10", "10", "10", 1),
            ("xyz", "10", "10", "10", "10", 1),
        ])),
        _ => None,
    }
}

fn px(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap_or_default()
}

fn build(rows: &[(&str, &str, &str, &str, &str, u64)]) -> Vec<RawRow> {
    rows.iter()
        .map(|&(date, o, h, l, c, v)| RawRow {
            date: date.to_string(),
            open: px(o),
            high: px(h),
            low: px(l),
            close: px(c),
            volume: v,
        })
        .collect()
}
