//! Intrabar data transfer objects and configuration primitives shared by every crate
//! in the workspace.
#![warn(missing_docs)]

mod config;
mod connector;
/// Unified error type.
pub mod error;
mod interval;
mod market;
mod reports;

pub use config::{IntrabarConfig, RetryConfig};
pub use connector::ConnectorKey;
pub use error::IntrabarError;
pub use interval::{Interval, Period, PeriodUnit};
pub use market::{
    Candle, CandleSeries, DateToken, IntradayRequest, RawRow, SeriesMeta, Tick, TickRequest,
    TickSeries,
};
pub use reports::{DownloadEntry, DownloadReport, DownloadResponse, SymbolWarning};

pub use rust_decimal::Decimal;
