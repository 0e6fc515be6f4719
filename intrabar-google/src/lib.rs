//! intrabar-google
//!
//! Connector for the Google Finance `getprices` endpoint. Responses encode the
//! date column as anchor/offset tokens; this crate fetches the body, tokenizes
//! it and hands the rows to the decoder in `intrabar-core`.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;
pub mod params;
pub mod response;

use std::sync::Arc;

use async_trait::async_trait;
use intrabar_core::{
    CandleSeries, IntrabarError, IntradayRequest,
    connector::{ConnectorKey, IntrabarConnector, IntradayProvider},
    reconstruct_timestamps,
};

#[cfg(not(feature = "test-adapters"))]
use adapter::RealAdapter;
use adapter::GetPrices;
pub use builder::GoogleConnectorBuilder;
pub use params::GetPricesParams;
pub use response::{GetPricesResponse, parse_getprices};

#[cfg(feature = "test-adapters")]
type PricesAdapter = Arc<dyn GetPrices>;
#[cfg(not(feature = "test-adapters"))]
type PricesAdapter = Arc<RealAdapter>;

/// Public connector type. Construct with [`GoogleConnector::builder`].
pub struct GoogleConnector {
    prices: PricesAdapter,
}

impl GoogleConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("intrabar-google");

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data") || m.contains("unknown symbol")
    }

    fn normalize_error(e: IntrabarError, what: &str) -> IntrabarError {
        match e {
            IntrabarError::Connector { connector: _, msg } => {
                if Self::looks_like_not_found(&msg) {
                    IntrabarError::not_found(what.to_string())
                } else {
                    IntrabarError::connector("intrabar-google", msg)
                }
            }
            IntrabarError::Other(msg) => IntrabarError::connector("intrabar-google", msg),
            other => other,
        }
    }

    pub(crate) fn with_prices(prices: PricesAdapter) -> Self {
        Self { prices }
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    #[must_use]
    pub fn from_adapter(prices: Arc<dyn GetPrices>) -> Self {
        Self::with_prices(prices)
    }
}

impl IntrabarConnector for GoogleConnector {
    fn name(&self) -> &'static str {
        "intrabar-google"
    }

    fn vendor(&self) -> &'static str {
        "Google Finance"
    }

    fn as_intraday_provider(&self) -> Option<&dyn IntradayProvider> {
        Some(self as &dyn IntradayProvider)
    }
}

#[async_trait]
impl IntradayProvider for GoogleConnector {
    async fn intraday(
        &self,
        symbol: &str,
        req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError> {
        let what = format!("intraday for {symbol}");
        let params = GetPricesParams::from_request(symbol, req);
        let body = self
            .prices
            .fetch(&params)
            .await
            .map_err(|e| Self::normalize_error(e, &what))?;

        let parsed = parse_getprices(&body)?;
        if parsed.rows.is_empty() {
            return Err(IntrabarError::not_found(what));
        }

        let interval = match parsed.interval {
            Some(advertised) => {
                #[cfg(feature = "tracing")]
                if advertised != req.interval {
                    tracing::warn!(
                        symbol,
                        requested = %req.interval,
                        advertised = %advertised,
                        "provider interval differs from request; decoding with provider interval"
                    );
                }
                advertised
            }
            None => req.interval,
        };

        let candles = reconstruct_timestamps(parsed.rows, interval)?;
        Ok(CandleSeries {
            symbol: symbol.to_string(),
            interval,
            candles,
            meta: Some(parsed.meta),
        })
    }
}
