//! Mock connectors for CI-safe tests and examples.
//!
//! [`MockConnector`] serves static fixtures through the real anchor/offset
//! decoder. [`DynamicMockConnector`] defers every call to a controller so tests
//! can script failures, hangs and recoveries.

use std::time::Duration;

use async_trait::async_trait;
use intrabar_core::connector::{IntrabarConnector, IntradayProvider, TickProvider};
use intrabar_core::{
    CandleSeries, IntrabarError, IntradayRequest, SeriesMeta, TickRequest, TickSeries,
    reconstruct_timestamps,
};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Mock connector with deterministic fixture data.
///
/// Special symbols:
/// - `FAIL`: connector error (retryable).
/// - `TIMEOUT`: sleeps before answering so orchestrator timeouts can fire.
/// - `BROKEN`: an offset row precedes the first anchor.
/// - `GARBLED`: a date token that is neither anchor nor offset.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Latency injected for the `TIMEOUT` symbol.
    pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

    /// Create the mock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(
        symbol: &str,
        capability: &'static str,
    ) -> Result<(), IntrabarError> {
        match symbol {
            "FAIL" => Err(IntrabarError::connector(
                "intrabar-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(Self::TIMEOUT_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl IntrabarConnector for MockConnector {
    fn name(&self) -> &'static str {
        "intrabar-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_intraday_provider(&self) -> Option<&dyn IntradayProvider> {
        Some(self as &dyn IntradayProvider)
    }

    fn as_tick_provider(&self) -> Option<&dyn TickProvider> {
        Some(self as &dyn TickProvider)
    }
}

#[async_trait]
impl IntradayProvider for MockConnector {
    async fn intraday(
        &self,
        symbol: &str,
        req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError> {
        Self::maybe_fail_or_timeout(symbol, "intraday").await?;
        let lookup = if symbol == "TIMEOUT" { "GOOG" } else { symbol };
        let rows = fixtures::intraday::by_symbol(lookup)
            .ok_or_else(|| IntrabarError::not_found(format!("intraday for {symbol}")))?;
        let candles = reconstruct_timestamps(rows, req.interval)?;
        Ok(CandleSeries {
            symbol: symbol.to_string(),
            interval: req.interval,
            candles,
            meta: Some(SeriesMeta {
                exchange: Some(req.exchange.clone().unwrap_or_else(|| "NASD".into())),
                market_open_minute: Some(570),
                market_close_minute: Some(960),
                utc_offset_minutes: Some(-300),
            }),
        })
    }
}

#[async_trait]
impl TickProvider for MockConnector {
    async fn ticks(&self, symbol: &str, req: &TickRequest) -> Result<TickSeries, IntrabarError> {
        Self::maybe_fail_or_timeout(symbol, "ticks").await?;
        let normalized: String = symbol
            .chars()
            .filter(|c| *c != '/')
            .collect::<String>()
            .to_ascii_uppercase();
        let ticks = fixtures::ticks::by_symbol(&normalized)
            .ok_or_else(|| IntrabarError::not_found(format!("ticks for {symbol}")))?;
        Ok(TickSeries {
            symbol: normalized,
            ticks: ticks.into_iter().filter(|t| req.contains(t.ts)).collect(),
        })
    }
}
