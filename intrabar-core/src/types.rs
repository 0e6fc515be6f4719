//! Re-export of foundational types from `intrabar-types`.
// Consolidated re-exports so downstream crates can depend on `intrabar-core` only

pub use intrabar_types::{ConnectorKey, IntrabarError};

pub use intrabar_types::{IntrabarConfig, RetryConfig};

pub use intrabar_types::{Interval, Period, PeriodUnit};

pub use intrabar_types::{
    Candle, CandleSeries, DateToken, IntradayRequest, RawRow, SeriesMeta, Tick, TickRequest,
    TickSeries,
};

pub use intrabar_types::{DownloadEntry, DownloadReport, DownloadResponse, SymbolWarning};

pub use intrabar_types::Decimal;
