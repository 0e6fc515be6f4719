use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::IntrabarError;

const MINUTE: u64 = 60;
const HOUR: u64 = 3_600;
const DAY: u64 = 86_400;

/// Length of time represented by one candle row.
///
/// Always positive and finite. Serialized as a floating-point number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Interval(Duration);

impl Interval {
    /// One-minute interval, the finest cadence the intraday endpoint serves.
    pub const MINUTE: Self = Self(Duration::from_secs(MINUTE));

    /// Whole-second interval.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `secs` is zero.
    pub fn from_secs(secs: u64) -> Result<Self, IntrabarError> {
        if secs == 0 {
            return Err(IntrabarError::InvalidArg(
                "interval must be positive".into(),
            ));
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    /// Fractional-second interval.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `secs` is not a finite number greater than zero, or
    /// rounds to zero nanoseconds.
    pub fn from_secs_f64(secs: f64) -> Result<Self, IntrabarError> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(IntrabarError::InvalidArg(format!(
                "interval must be a positive finite number of seconds, got {secs}"
            )));
        }
        let d = Duration::try_from_secs_f64(secs)
            .map_err(|e| IntrabarError::InvalidArg(format!("interval {secs}s: {e}")))?;
        if d.is_zero() {
            return Err(IntrabarError::InvalidArg(format!(
                "interval {secs}s is below nanosecond resolution"
            )));
        }
        Ok(Self(d))
    }

    /// Interval of `n` minutes.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `n` is zero.
    pub fn minutes(n: u64) -> Result<Self, IntrabarError> {
        Self::from_secs(n.saturating_mul(MINUTE))
    }

    /// Interval of `n` hours.
    ///
    /// # Errors
    /// Returns `InvalidArg` when `n` is zero.
    pub fn hours(n: u64) -> Result<Self, IntrabarError> {
        Self::from_secs(n.saturating_mul(HOUR))
    }

    /// Seconds per row as a floating-point number.
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Seconds per row when the interval is a whole number of seconds.
    #[must_use]
    pub fn whole_secs(self) -> Option<u64> {
        (self.0.subsec_nanos() == 0).then_some(self.0.as_secs())
    }

    /// The interval as a `Duration`.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::MINUTE
    }
}

impl From<Interval> for f64 {
    fn from(i: Interval) -> Self {
        i.as_secs_f64()
    }
}

impl TryFrom<f64> for Interval {
    type Error = IntrabarError;

    fn try_from(secs: f64) -> Result<Self, Self::Error> {
        Self::from_secs_f64(secs)
    }
}

impl TryFrom<Duration> for Interval {
    type Error = IntrabarError;

    fn try_from(d: Duration) -> Result<Self, Self::Error> {
        if d.is_zero() {
            return Err(IntrabarError::InvalidArg(
                "interval must be positive".into(),
            ));
        }
        Ok(Self(d))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.whole_secs() {
            Some(s) if s % DAY == 0 => write!(f, "{}d", s / DAY),
            Some(s) if s % HOUR == 0 => write!(f, "{}h", s / HOUR),
            Some(s) if s % MINUTE == 0 => write!(f, "{}min", s / MINUTE),
            Some(s) => write!(f, "{s}s"),
            None => write!(f, "{}s", self.as_secs_f64()),
        }
    }
}

/// Parses sampling frequencies such as `"60"`, `"30s"`, `"1Min"`, `"5min"`, `"5T"`,
/// `"1H"` and `"1D"`.
impl FromStr for Interval {
    type Err = IntrabarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(s.len());
        let (num, unit) = s.split_at(split);
        let amount: f64 = if num.is_empty() {
            1.0
        } else {
            num.parse()
                .map_err(|_| IntrabarError::InvalidArg(format!("invalid frequency '{s}'")))?
        };
        // Uppercase "M" means month-end, which has no fixed length.
        if unit == "M" {
            return Err(IntrabarError::InvalidArg(format!(
                "frequency '{s}' has no fixed length"
            )));
        }
        let unit_secs = match unit.to_ascii_lowercase().as_str() {
            "" | "s" | "sec" | "secs" | "second" | "seconds" => 1.0,
            "t" | "m" | "min" | "mins" | "minute" | "minutes" => 60.0,
            "h" | "hour" | "hours" => 3_600.0,
            "d" | "day" | "days" => 86_400.0,
            _ => {
                return Err(IntrabarError::InvalidArg(format!(
                    "unknown frequency unit in '{s}'"
                )));
            }
        };
        Self::from_secs_f64(amount * unit_secs)
    }
}

/// Unit of a lookback [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodUnit {
    /// Calendar days.
    Days,
    /// Years.
    Years,
}

/// Lookback window understood by the intraday endpoint, e.g. `3d` or `40Y`.
///
/// Parsing and deserialization reject a zero amount. The `const` constructors take
/// the amount as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodRepr")]
pub struct Period {
    /// Number of units.
    pub amount: u32,
    /// Unit of `amount`.
    pub unit: PeriodUnit,
}

impl Period {
    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: u32) -> Self {
        Self {
            amount: n,
            unit: PeriodUnit::Days,
        }
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: u32) -> Self {
        Self {
            amount: n,
            unit: PeriodUnit::Years,
        }
    }
}

#[derive(Deserialize)]
struct PeriodRepr {
    amount: u32,
    unit: PeriodUnit,
}

impl TryFrom<PeriodRepr> for Period {
    type Error = IntrabarError;

    fn try_from(p: PeriodRepr) -> Result<Self, Self::Error> {
        if p.amount == 0 {
            return Err(IntrabarError::InvalidArg(
                "period amount must be positive".into(),
            ));
        }
        Ok(Self {
            amount: p.amount,
            unit: p.unit,
        })
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::days(3)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            PeriodUnit::Days => write!(f, "{}d", self.amount),
            PeriodUnit::Years => write!(f, "{}Y", self.amount),
        }
    }
}

impl FromStr for Period {
    type Err = IntrabarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IntrabarError::InvalidArg(format!("invalid period '{s}'"));
        let s = s.trim();
        let last = s.chars().last().ok_or_else(invalid)?;
        let amount: u32 = s[..s.len() - last.len_utf8()]
            .parse()
            .map_err(|_| invalid())?;
        if amount == 0 {
            return Err(invalid());
        }
        let unit = match last {
            'd' | 'D' => PeriodUnit::Days,
            'y' | 'Y' => PeriodUnit::Years,
            _ => return Err(invalid()),
        };
        Ok(Self { amount, unit })
    }
}
