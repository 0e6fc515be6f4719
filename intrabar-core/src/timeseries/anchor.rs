//! Anchor/offset timestamp decoding.
//!
//! Intraday providers compress the date column of a candle series: the first row
//! of each run carries an absolute Unix timestamp prefixed with a marker (an
//! *anchor*), and the following rows carry only the number of intervals elapsed
//! since that anchor (an *offset*). Decoding is a single forward pass that keeps
//! the most recent anchor as its only state.

use chrono::{DateTime, TimeDelta, Utc};

use crate::{Candle, DateToken, Interval, IntrabarError, RawRow};

/// Marker prefixed to anchor tokens in the default encoding.
pub const ANCHOR_MARKER: char = 'a';

/// Incremental decoder for anchor/offset encoded rows.
///
/// Feed rows in provider order with [`AnchorDecoder::decode`]. Each call advances
/// an internal row counter that is reported in decoding errors, so a decoder
/// should not be reused across unrelated sequences.
#[derive(Debug, Clone)]
pub struct AnchorDecoder {
    interval: Interval,
    marker: char,
    last_anchor: Option<DateTime<Utc>>,
    row: usize,
}

impl AnchorDecoder {
    /// Decoder for `interval`-spaced offsets using [`ANCHOR_MARKER`].
    #[must_use]
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            marker: ANCHOR_MARKER,
            last_anchor: None,
            row: 0,
        }
    }

    /// Use a different anchor marker.
    ///
    /// # Errors
    /// Returns `InvalidArg` when the marker is an ASCII digit or `-`, either of
    /// which would make anchor and offset tokens ambiguous.
    pub fn with_marker(mut self, marker: char) -> Result<Self, IntrabarError> {
        if marker.is_ascii_digit() || marker == '-' {
            return Err(IntrabarError::InvalidArg(format!(
                "anchor marker {marker:?} collides with offset tokens"
            )));
        }
        self.marker = marker;
        Ok(self)
    }

    /// Most recent anchor seen, if any.
    #[must_use]
    pub const fn last_anchor(&self) -> Option<DateTime<Utc>> {
        self.last_anchor
    }

    /// Number of rows passed to [`AnchorDecoder::decode`] so far.
    #[must_use]
    pub const fn rows_seen(&self) -> usize {
        self.row
    }

    /// Decode the next row.
    ///
    /// # Errors
    /// - `MalformedSequence` when an offset row arrives before any anchor.
    /// - `UnrecognizedRowFormat` when the date token is neither form, or when the
    ///   resulting timestamp is outside the representable range.
    pub fn decode(&mut self, row: RawRow) -> Result<Candle, IntrabarError> {
        let idx = self.row;
        self.row += 1;

        let unrecognized = || IntrabarError::UnrecognizedRowFormat {
            row: idx,
            token: row.date.clone(),
        };

        let ts = match DateToken::parse(&row.date, self.marker) {
            Some(DateToken::Anchor(secs)) => {
                let ts = DateTime::from_timestamp(secs, 0).ok_or_else(unrecognized)?;
                #[cfg(feature = "tracing")]
                tracing::trace!(row = idx, anchor = secs, "new anchor");
                self.last_anchor = Some(ts);
                ts
            }
            Some(DateToken::Offset(n)) => {
                let anchor = self
                    .last_anchor
                    .ok_or(IntrabarError::MalformedSequence { row: idx })?;
                self.offset_from(anchor, n).ok_or_else(unrecognized)?
            }
            None => return Err(unrecognized()),
        };

        Ok(Candle::from_raw(ts, &row))
    }

    fn offset_from(&self, anchor: DateTime<Utc>, n: u64) -> Option<DateTime<Utc>> {
        let nanos = u128::from(n).checked_mul(self.interval.as_duration().as_nanos())?;
        let delta = TimeDelta::nanoseconds(i64::try_from(nanos).ok()?);
        anchor.checked_add_signed(delta)
    }
}

/// Decode a full sequence using [`ANCHOR_MARKER`].
///
/// The output has the same length and order as `rows`; only the date column is
/// replaced. Decoding stops at the first error.
///
/// # Errors
/// See [`AnchorDecoder::decode`].
///
/// ```
/// use intrabar_core::{reconstruct_timestamps, Interval, RawRow, Decimal};
///
/// let row = |date: &str| RawRow {
///     date: date.to_string(),
///     open: Decimal::ONE,
///     high: Decimal::ONE,
///     low: Decimal::ONE,
///     close: Decimal::ONE,
///     volume: 0,
/// };
/// let rows = vec![row("a1000"), row("0"), row("2")];
/// let candles = reconstruct_timestamps(rows, Interval::MINUTE).unwrap();
/// let secs: Vec<i64> = candles.iter().map(|c| c.ts.timestamp()).collect();
/// assert_eq!(secs, [1000, 1000, 1120]);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "intrabar::core::reconstruct",
        level = "debug",
        skip(rows),
        fields(rows = rows.len(), interval = %interval),
    )
)]
pub fn reconstruct_timestamps(
    rows: Vec<RawRow>,
    interval: Interval,
) -> Result<Vec<Candle>, IntrabarError> {
    let mut decoder = AnchorDecoder::new(interval);
    rows.into_iter().map(|r| decoder.decode(r)).collect()
}

/// Decode a full sequence with a custom anchor marker.
///
/// # Errors
/// `InvalidArg` for an ambiguous marker, otherwise see [`AnchorDecoder::decode`].
pub fn reconstruct_timestamps_with_marker(
    rows: Vec<RawRow>,
    interval: Interval,
    marker: char,
) -> Result<Vec<Candle>, IntrabarError> {
    let mut decoder = AnchorDecoder::new(interval).with_marker(marker)?;
    rows.into_iter().map(|r| decoder.decode(r)).collect()
}
