use chrono::{DateTime, TimeDelta, Utc};

use crate::Candle;

/// Sorted positive adjacent deltas, in seconds. Duplicate timestamps are ignored.
fn positive_deltas(candles: &[Candle]) -> Vec<i64> {
    let mut ts: Vec<DateTime<Utc>> = candles.iter().map(|c| c.ts).collect();
    ts.sort_unstable();
    ts.windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| *dt > TimeDelta::zero())
        .map(|dt| dt.num_seconds())
        .collect()
}

/// Estimate a representative step (in seconds) from positive adjacent timestamp
/// deltas in the input series.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median.
///
/// ```
/// use intrabar_core::{estimate_step_seconds, Candle, Decimal};
/// use chrono::DateTime;
///
/// let mk = |ts: i64| Candle {
///     ts: DateTime::from_timestamp(ts, 0).unwrap(),
///     open: Decimal::ONE,
///     high: Decimal::ONE,
///     low: Decimal::ONE,
///     close: Decimal::ONE,
///     volume: 0,
/// };
/// // Adjacent deltas: 60,60,60,120,180  => unique mode is 60
/// let candles = [mk(0), mk(60), mk(120), mk(180), mk(300), mk(480)];
/// assert_eq!(estimate_step_seconds(&candles), Some(60));
///
/// // Adjacent deltas: 60,60,120,120  => lower median is 60
/// let candles = [mk(0), mk(60), mk(120), mk(240), mk(360)];
/// assert_eq!(estimate_step_seconds(&candles), Some(60));
/// ```
///
/// The input order does not matter. Returns `None` if fewer than two distinct
/// timestamps are present.
#[must_use]
pub fn estimate_step_seconds(candles: &[Candle]) -> Option<i64> {
    let mut deltas = positive_deltas(candles);
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta: i64 = deltas[0];
    let mut best_count: usize = 0;
    let mut num_best_candidates: usize = 0;

    for run in deltas.chunk_by(|a, b| a == b) {
        match run.len().cmp(&best_count) {
            std::cmp::Ordering::Greater => {
                best_count = run.len();
                best_delta = run[0];
                num_best_candidates = 1;
            }
            std::cmp::Ordering::Equal => num_best_candidates += 1,
            std::cmp::Ordering::Less => {}
        }
    }

    if num_best_candidates == 1 {
        return Some(best_delta);
    }

    // Lower median keeps the answer an observed cadence.
    Some(deltas[(deltas.len() - 1) / 2])
}

/// Heuristic: determine if a series is sub-daily.
///
/// Returns `true` only if at least 3 adjacent deltas are strictly less than one
/// day and they make up at least 60% of all positive deltas.
#[must_use]
pub fn is_subdaily(candles: &[Candle]) -> bool {
    const DAY: i64 = 86_400;
    let deltas = positive_deltas(candles);
    if deltas.is_empty() {
        return false;
    }

    let total = deltas.len();
    let subdaily = deltas.iter().filter(|&&d| d < DAY).count();
    if subdaily < 3 {
        return false;
    }
    // subdaily/total >= 3/5
    subdaily.saturating_mul(5) >= total.saturating_mul(3)
}
