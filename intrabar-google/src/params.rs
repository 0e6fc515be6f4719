//! Query parameters for the `getprices` endpoint.

use intrabar_core::{Interval, IntradayRequest, Period};

/// Exchange used when the request does not name one.
pub const DEFAULT_EXCHANGE: &str = "NASD";
/// Requested columns: date, close, high, low, open, volume.
pub const DEFAULT_FIELDS: &str = "d,c,h,l,o,v";
/// Date format flag understood by the endpoint.
pub const DEFAULT_DATE_FORMAT: &str = "cpct";

/// Fully resolved `getprices` query.
///
/// The column order the endpoint returns does not necessarily follow `fields`;
/// the response's `COLUMNS` header is authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPricesParams {
    /// `q`: ticker symbol.
    pub symbol: String,
    /// `x`: exchange code (e.g. `NASD`, `ETR`).
    pub exchange: String,
    /// `i`: bar size.
    pub interval: Interval,
    /// `p`: lookback window, e.g. `3d` or `40Y`.
    pub period: Period,
    /// `f`: requested columns.
    pub fields: String,
    /// `df`: date format flag.
    pub date_format: String,
    /// `auto`: passed through verbatim.
    pub auto: String,
    /// `ei`: passed through verbatim.
    pub ei: String,
    /// `ts`: starting Unix timestamp. The endpoint uses "today" when omitted.
    pub start: Option<i64>,
}

impl GetPricesParams {
    /// Resolve a query for `symbol`, applying the endpoint defaults.
    #[must_use]
    pub fn from_request(symbol: &str, req: &IntradayRequest) -> Self {
        Self {
            symbol: symbol.to_string(),
            exchange: req
                .exchange
                .clone()
                .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string()),
            interval: req.interval,
            period: req.period,
            fields: DEFAULT_FIELDS.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            auto: String::new(),
            ei: String::new(),
            start: req.start.map(|t| t.timestamp()),
        }
    }

    /// Query pairs in wire order. `ts` is left out when no start is set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let interval = self.interval.whole_secs().map_or_else(
            || self.interval.as_secs_f64().to_string(),
            |s| s.to_string(),
        );
        let mut pairs = vec![
            ("q", self.symbol.clone()),
            ("x", self.exchange.clone()),
            ("i", interval),
            ("p", self.period.to_string()),
            ("f", self.fields.clone()),
            ("df", self.date_format.clone()),
            ("auto", self.auto.clone()),
            ("ei", self.ei.clone()),
        ];
        if let Some(ts) = self.start {
            pairs.push(("ts", ts.to_string()));
        }
        pairs
    }
}
