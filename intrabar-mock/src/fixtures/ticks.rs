use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use intrabar_core::{Decimal, Tick};

pub fn by_symbol(s: &str) -> Option<Vec<Tick>> {
    match s {
        "AUDUSD" => Some(build(&[
            ("20140101 21:55:34.404", "0.88796", "0.88922"),
            ("20140101 21:55:35.120", "0.88797", "0.88925"),
            ("20140115 09:12:01.001", "0.88410", "0.88420"),
            ("20140203 00:03:38.169", "0.87500", "0.87524"),
        ])),
        "EURUSD" => Some(build(&[
            ("20140102 00:00:01.250", "1.37640", "1.37660"),
            ("20140102 00:00:02.500", "1.37645", "1.37662"),
        ])),
        _ => None,
    }
}

fn ts(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y%m%d %H:%M:%S%.3f")
        .map(|t| t.and_utc())
        .unwrap_or_default()
}

fn build(rows: &[(&str, &str, &str)]) -> Vec<Tick> {
    rows.iter()
        .map(|&(t, bid, ask)| Tick {
            ts: ts(t),
            bid: Decimal::from_str(bid).unwrap_or_default(),
            ask: Decimal::from_str(ask).unwrap_or_default(),
        })
        .collect()
}
