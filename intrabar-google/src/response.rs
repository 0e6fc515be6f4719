//! Tokenizer for `getprices` response bodies.
//!
//! A body is a block of `KEY=VALUE` header lines followed by comma separated
//! data rows:
//!
//! ```text
//! EXCHANGE%3DNASDAQ
//! MARKET_OPEN_MINUTE=570
//! MARKET_CLOSE_MINUTE=960
//! INTERVAL=60
//! COLUMNS=DATE,CLOSE,HIGH,LOW,OPEN,VOLUME
//! DATA=
//! TIMEZONE_OFFSET=-300
//! a1455892200,700.5,701,700.1,700.2,12345
//! 1,700.6,700.9,700.4,700.5,2300
//! ```
//!
//! `TIMEZONE_OFFSET` lines may also appear between data rows when the window
//! spans a daylight-saving change. The date column is left undecoded.

use std::str::FromStr;

use intrabar_core::{Decimal, Interval, IntrabarError, RawRow, SeriesMeta};

const EXCHANGE_KEY: &str = "EXCHANGE%3D";

/// Column order used when the body carries no `COLUMNS` header.
pub const DEFAULT_COLUMNS: [&str; 6] = ["DATE", "CLOSE", "HIGH", "LOW", "OPEN", "VOLUME"];

/// Tokenized response: header metadata plus undecoded rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPricesResponse {
    /// Exchange, session bounds and the first reported UTC offset.
    pub meta: SeriesMeta,
    /// Bar size advertised by the `INTERVAL` header, if present.
    pub interval: Option<Interval>,
    /// Data rows in body order.
    pub rows: Vec<RawRow>,
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl ColumnMap {
    fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, IntrabarError> {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_ascii_uppercase())
            .collect();
        let find = |col: &str| {
            names
                .iter()
                .position(|n| n == col)
                .ok_or_else(|| IntrabarError::Data(format!("missing {col} column")))
        };
        Ok(Self {
            date: find("DATE")?,
            open: find("OPEN")?,
            high: find("HIGH")?,
            low: find("LOW")?,
            close: find("CLOSE")?,
            volume: find("VOLUME")?,
        })
    }
}

fn header_value<T: FromStr>(key: &str, value: &str) -> Result<T, IntrabarError> {
    value
        .trim()
        .parse()
        .map_err(|_| IntrabarError::Data(format!("bad {key} header: {value:?}")))
}

/// Split a body into header metadata and raw rows.
///
/// # Errors
/// Returns `Data` when a header value is malformed, a required column is
/// missing, or a numeric field does not parse. Row errors name the zero-based data
/// row, the same index the candle decoder reports.
pub fn parse_getprices(body: &str) -> Result<GetPricesResponse, IntrabarError> {
    let mut meta = SeriesMeta::default();
    let mut interval = None;
    let mut columns = None;
    let mut data = String::new();

    for line in body.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(EXCHANGE_KEY) {
            // The separator is percent-encoded on this one line only.
            let decoded: String = url::form_urlencoded::parse(line.as_bytes())
                .map(|(k, _)| k.into_owned())
                .collect();
            meta.exchange = decoded.split_once('=').map(|(_, v)| v.to_string());
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            data.push_str(line);
            data.push('\n');
            continue;
        };
        match key {
            "MARKET_OPEN_MINUTE" => meta.market_open_minute = Some(header_value(key, value)?),
            "MARKET_CLOSE_MINUTE" => meta.market_close_minute = Some(header_value(key, value)?),
            "INTERVAL" => {
                let secs: f64 = header_value(key, value)?;
                interval = Some(
                    Interval::from_secs_f64(secs)
                        .map_err(|e| IntrabarError::Data(format!("bad INTERVAL header: {e}")))?,
                );
            }
            "COLUMNS" => columns = Some(ColumnMap::from_names(value.split(','))?),
            "TIMEZONE_OFFSET" => {
                if meta.utc_offset_minutes.is_none() {
                    meta.utc_offset_minutes = Some(header_value(key, value)?);
                }
            }
            _ => {}
        }
    }

    let columns = match columns {
        Some(c) => c,
        None => ColumnMap::from_names(DEFAULT_COLUMNS)?,
    };
    let rows = parse_rows(&data, columns)?;
    Ok(GetPricesResponse {
        meta,
        interval,
        rows,
    })
}

fn parse_rows(data: &str, cols: ColumnMap) -> Result<Vec<RawRow>, IntrabarError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| IntrabarError::Data(format!("row {i}: {e}")))?;
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .ok_or_else(|| IntrabarError::Data(format!("row {i}: missing {name}")))
        };
        let price = |idx: usize, name: &str| -> Result<Decimal, IntrabarError> {
            let raw = field(idx, name)?;
            Decimal::from_str(raw.trim())
                .map_err(|_| IntrabarError::Data(format!("row {i}: bad {name} {raw:?}")))
        };
        let volume = field(cols.volume, "volume")?;
        rows.push(RawRow {
            date: field(cols.date, "date")?.to_string(),
            open: price(cols.open, "open")?,
            high: price(cols.high, "high")?,
            low: price(cols.low, "low")?,
            close: price(cols.close, "close")?,
            volume: volume
                .trim()
                .parse()
                .map_err(|_| IntrabarError::Data(format!("row {i}: bad volume {volume:?}")))?,
        });
    }
    Ok(rows)
}
