//! intrabar-core
//!
//! Core types, traits, and decoding utilities shared across the intrabar workspace.
//!
//! - `types`: common data structures (raw rows, candles, ticks, requests, reports).
//! - `connector`: the `IntrabarConnector` trait and capability provider traits.
//! - `timeseries`: the anchor/offset timestamp decoder and cadence inference.
//!
//! The decoder is synchronous and pure. Connector traits are async and assume a
//! Tokio 1.x runtime on the caller's side.
#![warn(missing_docs)]

/// Connector capability traits and the primary `IntrabarConnector` interface.
pub mod connector;
/// Time-series utilities: timestamp reconstruction and cadence inference.
pub mod timeseries;
pub mod types;

pub use connector::IntrabarConnector;
pub use timeseries::anchor::{
    ANCHOR_MARKER, AnchorDecoder, reconstruct_timestamps, reconstruct_timestamps_with_marker,
};
pub use timeseries::infer::{estimate_step_seconds, is_subdaily};
pub use types::*;
