//! Report envelopes produced by the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::IntrabarError;
use crate::market::CandleSeries;

/// Candles fetched for one symbol of a bulk download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadEntry {
    /// Requested symbol.
    pub symbol: String,
    /// Decoded series.
    pub series: CandleSeries,
}

/// Successful part of a bulk download, in request order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DownloadResponse {
    /// One entry per symbol that succeeded.
    pub entries: Vec<DownloadEntry>,
}

impl DownloadResponse {
    /// Look up the series for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&CandleSeries> {
        self.entries
            .iter()
            .find(|e| e.symbol == symbol)
            .map(|e| &e.series)
    }
}

/// A symbol that failed during a bulk download, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolWarning {
    /// Symbol that failed.
    pub symbol: String,
    /// Why it failed.
    pub error: IntrabarError,
}

impl std::fmt::Display for SymbolWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.symbol, self.error)
    }
}

/// Summary of a multi-symbol intraday download.
///
/// Wraps a [`DownloadResponse`] payload when at least one symbol succeeded, plus one
/// warning per failed symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DownloadReport {
    /// Aggregated download payload.
    pub response: Option<DownloadResponse>,
    /// Per-symbol failures that did not abort the batch.
    pub warnings: Vec<SymbolWarning>,
}
