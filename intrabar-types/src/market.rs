//! Rows, candles, ticks and the requests that produce them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IntrabarError;
use crate::interval::{Interval, Period};

/// A tokenized provider row whose date column has not been decoded yet.
///
/// `date` is either an anchor token (marker followed by Unix seconds) or an offset
/// token (number of intervals since the most recent anchor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// Undecoded date token, e.g. `"a1455892200"` or `"17"`.
    pub date: String,
    /// Opening price.
    pub open: Decimal,
    /// Highest price during the interval.
    pub high: Decimal,
    /// Lowest price during the interval.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Volume traded during the interval.
    pub volume: u64,
}

/// The two shapes a date token can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateToken {
    /// Absolute Unix timestamp in seconds.
    Anchor(i64),
    /// Number of intervals since the most recent anchor.
    Offset(u64),
}

impl DateToken {
    /// Classify `token` against the anchor `marker`.
    ///
    /// Anchor tokens are the marker followed by an optional `-` and ASCII digits.
    /// Offset tokens are ASCII digits only. Anything else, including surrounding
    /// whitespace, signs on offsets or values that overflow, yields `None`.
    #[must_use]
    pub fn parse(token: &str, marker: char) -> Option<Self> {
        if let Some(rest) = token.strip_prefix(marker) {
            let digits = rest.strip_prefix('-').unwrap_or(rest);
            if !is_ascii_digits(digits) {
                return None;
            }
            rest.parse().ok().map(Self::Anchor)
        } else if is_ascii_digits(token) {
            token.parse().ok().map(Self::Offset)
        } else {
            None
        }
    }
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A decoded OHLCV bar with an absolute timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Start of the interval (UTC).
    pub ts: DateTime<Utc>,
    /// Opening price.
    pub open: Decimal,
    /// Highest price during the interval.
    pub high: Decimal,
    /// Lowest price during the interval.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Volume traded during the interval.
    pub volume: u64,
}

impl Candle {
    /// Attach a decoded timestamp to a raw row, leaving the numeric fields untouched.
    #[must_use]
    pub fn from_raw(ts: DateTime<Utc>, row: &RawRow) -> Self {
        Self {
            ts,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        }
    }
}

/// Provider-supplied context about a candle series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMeta {
    /// Exchange code as reported by the provider.
    pub exchange: Option<String>,
    /// Regular session open, in minutes after local midnight.
    pub market_open_minute: Option<u32>,
    /// Regular session close, in minutes after local midnight.
    pub market_close_minute: Option<u32>,
    /// Exchange-local offset from UTC, in minutes.
    pub utc_offset_minutes: Option<i32>,
}

/// Decoded candles for one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandleSeries {
    /// The symbol this data represents (e.g. "GOOG").
    pub symbol: String,
    /// Interval each candle spans.
    pub interval: Interval,
    /// Candles in provider order.
    pub candles: Vec<Candle>,
    /// Optional provider metadata.
    pub meta: Option<SeriesMeta>,
}

/// Parameters for an intraday candle request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntradayRequest {
    /// Sampling interval.
    pub interval: Interval,
    /// Lookback window.
    pub period: Period,
    /// Optional start of the window; providers default to "now" when absent.
    pub start: Option<DateTime<Utc>>,
    /// Optional exchange code; connectors apply their own default when absent.
    pub exchange: Option<String>,
}

impl IntradayRequest {
    /// Request with the given interval and default period.
    #[must_use]
    pub fn new(interval: Interval) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    /// Set the lookback window.
    #[must_use]
    pub const fn period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    /// Set the start timestamp.
    #[must_use]
    pub const fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the exchange code.
    #[must_use]
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }
}

/// A single bid/ask quote from a tick archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    /// Quote time (UTC, millisecond precision).
    pub ts: DateTime<Utc>,
    /// Bid price.
    pub bid: Decimal,
    /// Ask price.
    pub ask: Decimal,
}

/// Ticks for one symbol in archive order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSeries {
    /// Normalized symbol, e.g. "AUDUSD".
    pub symbol: String,
    /// Ticks in archive order.
    pub ticks: Vec<Tick>,
}

/// Inclusive date range for a tick download.
///
/// `start <= end` holds for every value, including deserialized ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TickRange")]
pub struct TickRequest {
    start: NaiveDate,
    end: NaiveDate,
}

/// Unvalidated wire form of [`TickRequest`].
#[derive(Deserialize)]
struct TickRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<TickRange> for TickRequest {
    type Error = IntrabarError;

    fn try_from(r: TickRange) -> Result<Self, Self::Error> {
        Self::new(r.start, r.end)
    }
}

impl TickRequest {
    /// Build a validated range.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, IntrabarError> {
        if start > end {
            return Err(IntrabarError::InvalidArg(format!(
                "tick range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `ts` falls on a day within the range.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        let d = ts.date_naive();
        self.start <= d && d <= self.end
    }
}
