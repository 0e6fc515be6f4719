use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the intrabar workspace.
///
/// Covers the two decoding failures of the anchor/offset candle encoding, response
/// and argument validation, connector-tagged provider failures, timeouts and the
/// outcome of an exhausted retry budget.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntrabarError {
    /// An offset row appeared before any anchor row in the same sequence.
    #[error("malformed sequence: offset row {row} has no preceding anchor")]
    MalformedSequence {
        /// Zero-based index of the offending row.
        row: usize,
    },

    /// A date token is neither anchor-form nor a plain non-negative integer.
    #[error("unrecognized row format at row {row}: {token:?}")]
    UnrecognizedRowFormat {
        /// Zero-based index of the offending row.
        row: usize,
        /// The raw date token as received.
        token: String,
    },

    /// Issues with the returned or expected data (missing columns, bad numbers, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// No registered connector offers the requested capability.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "intraday").
        capability: String,
    },

    /// A resource or symbol could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "intraday for GOOG".
        what: String,
    },

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "intraday", "ticks").
        capability: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// Every attempt allowed by the retry configuration failed.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Number of attempts made, including the first one.
        attempts: u32,
        /// The error returned by the final attempt.
        last: Box<IntrabarError>,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl IntrabarError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Returns true for failures that a later attempt might not hit again.
    ///
    /// Only transport-level failures qualify. Decoding errors, missing symbols and
    /// argument problems are deterministic for a given response and are never retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connector { .. } | Self::ProviderTimeout { .. } | Self::Other(_)
        )
    }

    /// Returns true if this error came from decoding the anchor/offset date column.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedSequence { .. } | Self::UnrecognizedRowFormat { .. }
        )
    }

    /// Unwrap a `RetriesExhausted` wrapper down to the error of the last attempt.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::RetriesExhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }
}
