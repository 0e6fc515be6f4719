//! Time-series utilities shared by connectors and the orchestrator.
//!
//! - `anchor`: decode anchor/offset date columns into absolute timestamps
//! - `infer`: infer the cadence of a decoded series
/// Anchor/offset timestamp reconstruction.
pub mod anchor;
/// Interval inference and sub-daily detection helpers.
pub mod infer;
