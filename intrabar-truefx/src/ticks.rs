use std::str::FromStr;

use chrono::NaiveDateTime;

use intrabar_core::{Decimal, IntrabarError, Tick};

const TS_FORMAT: &str = "%Y%m%d %H:%M:%S%.3f";

/// Parse archive rows of the form `AUD/USD,20140101 21:55:34.404,0.88796,0.88922`.
///
/// Columns are symbol, UTC timestamp with milliseconds, bid and ask. The file has
/// no header row. Errors name the zero-based data row, matching the indices used by the
/// candle decoder.
///
/// # Errors
/// Returns `Data` for short rows, unparseable timestamps or prices.
pub fn parse_ticks(csv: &str) -> Result<Vec<Tick>, IntrabarError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv.as_bytes());

    let mut out = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| IntrabarError::Data(format!("row {i}: {e}")))?;
        if record.len() < 4 {
            return Err(IntrabarError::Data(format!(
                "row {i}: expected 4 columns, got {}",
                record.len()
            )));
        }
        let ts = NaiveDateTime::parse_from_str(record[1].trim(), TS_FORMAT)
            .map_err(|e| IntrabarError::Data(format!("row {i}: bad timestamp: {e}")))?
            .and_utc();
        let price = |idx: usize, name: &str| {
            Decimal::from_str(record[idx].trim()).map_err(|_| {
                IntrabarError::Data(format!("row {i}: bad {name} {:?}", &record[idx]))
            })
        };
        out.push(Tick {
            ts,
            bid: price(2, "bid")?,
            ask: price(3, "ask")?,
        });
    }
    Ok(out)
}
