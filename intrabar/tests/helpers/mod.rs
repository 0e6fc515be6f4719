// Shared fixtures for orchestrator tests; not every test file uses every helper.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use intrabar::{
    Candle, CandleSeries, Decimal, IntrabarConnector, Interval, IntradayRequest, RetryConfig,
};

pub const AAPL: &str = "AAPL";
pub const MSFT: &str = "MSFT";
pub const GOOG: &str = "GOOG";

/// A connector that advertises no capabilities at all.
pub struct Bare(pub &'static str);

impl IntrabarConnector for Bare {
    fn name(&self) -> &'static str {
        self.0
    }
}

pub fn bare(name: &'static str) -> Arc<dyn IntrabarConnector> {
    Arc::new(Bare(name))
}

pub fn minute_request() -> IntradayRequest {
    IntradayRequest::new(Interval::MINUTE)
}

/// Retry policy with a tiny fixed delay and no jitter.
pub fn fast_retry(retry_count: u32) -> RetryConfig {
    RetryConfig {
        retry_count,
        pause: Duration::from_millis(1),
        backoff_factor: 1,
        max_pause: Duration::from_millis(1),
        jitter_percent: 0,
    }
}

/// Minute candles at the given Unix timestamps, all with the same flat price.
pub fn series(symbol: &str, ts: &[i64]) -> CandleSeries {
    let px = Decimal::new(100, 0);
    CandleSeries {
        symbol: symbol.to_string(),
        interval: Interval::MINUTE,
        candles: ts
            .iter()
            .map(|&t| Candle {
                ts: DateTime::from_timestamp(t, 0).unwrap(),
                open: px,
                high: px,
                low: px,
                close: px,
                volume: 1,
            })
            .collect(),
        meta: None,
    }
}
