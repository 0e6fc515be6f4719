use async_trait::async_trait;

pub use intrabar_types::ConnectorKey;

use crate::{CandleSeries, IntrabarError, IntradayRequest, TickRequest, TickSeries};

/// Focused role trait for connectors that serve decoded intraday candles.
#[async_trait]
pub trait IntradayProvider: Send + Sync {
    /// Fetch and decode intraday candles for `symbol`.
    ///
    /// Implementations must surface `MalformedSequence` and
    /// `UnrecognizedRowFormat` unchanged so callers can tell a broken response
    /// from a transport failure.
    async fn intraday(
        &self,
        symbol: &str,
        req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError>;
}

/// Focused role trait for connectors that serve historical bid/ask ticks.
#[async_trait]
pub trait TickProvider: Send + Sync {
    /// Fetch ticks for `symbol` within the request's date range.
    async fn ticks(&self, symbol: &str, req: &TickRequest) -> Result<TickSeries, IntrabarError>;
}

/// Main connector trait implemented by data sources.
///
/// Capabilities are discovered through the `as_*_provider` accessors; a connector
/// returns `Some(self)` for each role trait it implements.
pub trait IntrabarConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g., "intrabar-google").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise intraday capability.
    fn as_intraday_provider(&self) -> Option<&dyn IntradayProvider> {
        None
    }

    /// Advertise tick capability.
    fn as_tick_provider(&self) -> Option<&dyn TickProvider> {
        None
    }
}
