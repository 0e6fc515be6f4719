//! Intrabar fetches intraday candles and ticks from pluggable providers.
//!
//! Overview
//! - Routes requests to connectors that implement the `intrabar_core` contracts.
//! - Bounds each provider attempt with a timeout and retries transient failures with
//!   exponential backoff and jitter.
//! - Downloads many symbols concurrently, turning per-symbol failures into warnings.
//! - Exposes the uniform domain types from `intrabar_core`, including the anchor/offset
//!   timestamp decoder used by connectors.
//!
//! Key behaviors and trade-offs
//! - Routing: the preferred connector wins when it offers the capability; otherwise the
//!   first registered capable connector. One provider serves each request, so results
//!   never mix sources.
//! - Retries: only transport-level failures are retried. A response that fails to
//!   decode (`MalformedSequence`, `UnrecognizedRowFormat`) fails fast, since fetching
//!   the same bytes again cannot fix it.
//! - Downloads: symbols run concurrently; an optional request deadline bounds the
//!   whole batch.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use intrabar::{Interval, IntradayRequest, Intrabar, Period};
//! use intrabar_google::GoogleConnector;
//!
//! let intrabar = Intrabar::builder()
//!     .with_connector(Arc::new(GoogleConnector::builder().build()?))
//!     .build()?;
//!
//! let req = IntradayRequest::new(Interval::MINUTE).period(Period::days(3));
//! let goog = intrabar.intraday("GOOG", &req).await?;
//!
//! let report = intrabar
//!     .download()
//!     .symbols(&["AAPL", "MSFT"])?
//!     .request(req)
//!     .run()
//!     .await?;
//! for w in &report.warnings {
//!     eprintln!("{w}");
//! }
//! ```
//!
//! See `intrabar/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{Intrabar, IntrabarBuilder, tag_err};
pub use router::download::DownloadBuilder;
pub use router::util::join_with_deadline;

pub use intrabar_core::connector::{ConnectorKey, IntrabarConnector, IntradayProvider, TickProvider};
pub use intrabar_core::{
    ANCHOR_MARKER, AnchorDecoder, estimate_step_seconds, is_subdaily, reconstruct_timestamps,
    reconstruct_timestamps_with_marker,
};

// Re-export core types for convenience
pub use intrabar_types::{
    Candle, CandleSeries, DateToken, Decimal, DownloadEntry, DownloadReport, DownloadResponse,
    Interval, IntrabarConfig, IntrabarError, IntradayRequest, Period, PeriodUnit, RawRow,
    RetryConfig, SeriesMeta, SymbolWarning, Tick, TickRequest, TickSeries,
};
