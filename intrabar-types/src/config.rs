//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::IntrabarError;

/// Retry policy applied around every provider call.
///
/// The delay before retry `n` (zero-based) is `pause * backoff_factor^n`, capped at
/// `max_pause`, plus up to `jitter_percent` percent of random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of additional attempts after the first failure.
    pub retry_count: u32,
    /// Base delay before the first retry.
    pub pause: Duration,
    /// Exponential factor applied per retry (>= 1).
    pub backoff_factor: u32,
    /// Upper bound for a single delay, before jitter.
    pub max_pause: Duration,
    /// Random jitter percentage [0, 100] added to each delay.
    pub jitter_percent: u8,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            pause: Duration::from_millis(100),
            backoff_factor: 2,
            max_pause: Duration::from_secs(5),
            jitter_percent: 10,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            retry_count: 0,
            pause: Duration::ZERO,
            backoff_factor: 1,
            max_pause: Duration::ZERO,
            jitter_percent: 0,
        }
    }

    /// Check internal consistency.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `backoff_factor` is zero, `jitter_percent` exceeds 100,
    /// or `max_pause` is shorter than `pause`.
    pub fn validate(&self) -> Result<(), IntrabarError> {
        if self.backoff_factor == 0 {
            return Err(IntrabarError::InvalidArg(
                "retry backoff_factor must be at least 1".into(),
            ));
        }
        if self.jitter_percent > 100 {
            return Err(IntrabarError::InvalidArg(format!(
                "retry jitter_percent must be within 0..=100, got {}",
                self.jitter_percent
            )));
        }
        if self.max_pause < self.pause {
            return Err(IntrabarError::InvalidArg(
                "retry max_pause must not be shorter than pause".into(),
            ));
        }
        Ok(())
    }

    /// Delay before retry number `retry` (zero-based), without jitter.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_factor.saturating_pow(retry);
        self.pause.saturating_mul(factor).min(self.max_pause)
    }
}

/// Global configuration for the `Intrabar` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrabarConfig {
    /// Retry policy for provider calls.
    pub retry: RetryConfig,
    /// Timeout for each individual provider attempt.
    pub provider_timeout: Duration,
    /// Optional overall deadline for multi-symbol downloads.
    pub request_timeout: Option<Duration>,
}

impl Default for IntrabarConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            provider_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}
