//! intrabar-truefx
//!
//! Connector for the TrueFX historical tick archive. Each currency pair is
//! published as one zipped CSV per month; the connector downloads the months a
//! request spans, extracts the CSV in memory and keeps ticks inside the range.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
/// Archive naming, extraction and month enumeration.
pub mod archive;
mod builder;
/// Tick CSV parsing.
pub mod ticks;

use std::sync::Arc;

use crate::adapter::TrueFxArchive;

use async_trait::async_trait;
use intrabar_core::{
    IntrabarError, TickRequest, TickSeries,
    connector::{ConnectorKey, IntrabarConnector, TickProvider},
};
#[cfg(not(feature = "test-adapters"))]
use adapter::RealAdapter;
pub use archive::{
    DEFAULT_BASE_URL, archive_url, csv_filename, extract_csv, months_between, normalize_symbol,
};
pub use builder::TrueFxConnectorBuilder;
pub use ticks::parse_ticks;

#[cfg(feature = "test-adapters")]
type ArchiveAdapter = Arc<dyn TrueFxArchive>;
#[cfg(not(feature = "test-adapters"))]
type ArchiveAdapter = Arc<RealAdapter>;

/// Public connector type.
pub struct TrueFxConnector {
    archive: ArchiveAdapter,
}

impl TrueFxConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("intrabar-truefx");

    /// Connector for the public archive with a default HTTP client.
    ///
    /// # Errors
    /// Returns `Other` if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self, IntrabarError> {
        Self::builder().build()
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    #[must_use]
    pub fn from_adapter(archive: Arc<dyn TrueFxArchive>) -> Self {
        Self { archive }
    }

    fn normalize_error(e: IntrabarError) -> IntrabarError {
        match e {
            IntrabarError::Other(msg) => IntrabarError::connector("intrabar-truefx", msg),
            IntrabarError::Connector { connector: _, msg } => {
                IntrabarError::connector("intrabar-truefx", msg)
            }
            other => other,
        }
    }
}

impl IntrabarConnector for TrueFxConnector {
    fn name(&self) -> &'static str {
        "intrabar-truefx"
    }

    fn vendor(&self) -> &'static str {
        "TrueFX"
    }

    fn as_tick_provider(&self) -> Option<&dyn TickProvider> {
        Some(self as &dyn TickProvider)
    }
}

#[async_trait]
impl TickProvider for TrueFxConnector {
    async fn ticks(&self, symbol: &str, req: &TickRequest) -> Result<TickSeries, IntrabarError> {
        let symbol = normalize_symbol(symbol);
        let mut ticks = Vec::new();
        for (year, month) in months_between(req.start(), req.end()) {
            let bytes = self
                .archive
                .fetch_month(&symbol, year, month)
                .await
                .map_err(Self::normalize_error)?;
            let csv = extract_csv(&bytes, &csv_filename(&symbol, year, month))?;
            let parsed = parse_ticks(&csv)?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                symbol = %symbol,
                year,
                month,
                rows = parsed.len(),
                "parsed tick archive"
            );

            ticks.extend(parsed.into_iter().filter(|t| req.contains(t.ts)));
        }
        Ok(TickSeries { symbol, ticks })
    }
}
