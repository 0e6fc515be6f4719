use std::sync::Arc;
use std::time::Duration;

use intrabar_core::connector::{ConnectorKey, IntrabarConnector, IntradayProvider, TickProvider};
use intrabar_types::{
    CandleSeries, IntrabarConfig, IntrabarError, IntradayRequest, RetryConfig, TickRequest,
    TickSeries,
};
use rand::Rng;

/// Orchestrator that routes intraday and tick requests to registered connectors.
pub struct Intrabar {
    pub(crate) connectors: Vec<Arc<dyn IntrabarConnector>>,
    pub(crate) cfg: IntrabarConfig,
    pub(crate) preferred: Option<ConnectorKey>,
}

/// Builder for constructing an `Intrabar` orchestrator with custom configuration.
pub struct IntrabarBuilder {
    connectors: Vec<Arc<dyn IntrabarConnector>>,
    cfg: IntrabarConfig,
    preferred: Option<ConnectorKey>,
}

impl Default for IntrabarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IntrabarBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no connectors; register at least one via [`Self::with_connector`].
    /// - Defaults: three retries starting at 100ms and doubling up to 5s with 10% jitter,
    ///   a 10s per-attempt timeout and no overall deadline.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            cfg: IntrabarConfig::default(),
            preferred: None,
        }
    }

    /// Register a provider connector.
    ///
    /// Registration order decides routing when no preference is set or the preferred
    /// connector lacks the requested capability.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn IntrabarConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Route to the connector with this key whenever it offers the capability.
    #[must_use]
    pub const fn prefer(mut self, key: ConnectorKey) -> Self {
        self.preferred = Some(key);
        self
    }

    /// Replace the retry policy.
    ///
    /// Behavior and trade-offs:
    /// - Only transient failures (connector errors, provider timeouts) are retried.
    ///   Decode errors and missing symbols fail on the first attempt.
    /// - Longer pauses go easier on rate-limited providers but stretch the tail latency
    ///   of a failing request to roughly the sum of all delays.
    #[must_use]
    pub const fn retry(mut self, cfg: RetryConfig) -> Self {
        self.cfg.retry = cfg;
        self
    }

    /// Set the timeout applied to each individual provider attempt.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for a request, retries and downloads included.
    ///
    /// When the deadline elapses, the call returns `RequestTimeout` and the in-flight
    /// provider futures are dropped.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: IntrabarConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Intrabar` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connectors have been registered, if the preferred key
    /// does not match any registered connector, or if the retry policy is inconsistent.
    pub fn build(self) -> Result<Intrabar, IntrabarError> {
        if self.connectors.is_empty() {
            return Err(IntrabarError::InvalidArg(
                "no connectors registered; add at least one with with_connector".into(),
            ));
        }
        if let Some(key) = self.preferred
            && !self.connectors.iter().any(|c| c.key() == key)
        {
            return Err(IntrabarError::InvalidArg(format!(
                "preferred connector '{key}' is not registered"
            )));
        }
        self.cfg.retry.validate()?;
        if self.cfg.provider_timeout.is_zero() {
            return Err(IntrabarError::InvalidArg(
                "provider_timeout must be greater than zero".into(),
            ));
        }

        Ok(Intrabar {
            connectors: self.connectors,
            cfg: self.cfg,
            preferred: self.preferred,
        })
    }
}

/// Tag an opaque error with the connector that produced it.
///
/// Errors that already carry enough context are returned unchanged.
pub fn tag_err(connector: &str, e: IntrabarError) -> IntrabarError {
    match e {
        IntrabarError::Other(msg) => IntrabarError::Connector {
            connector: connector.to_string(),
            msg,
        },
        other => other,
    }
}

/// Base delay plus up to `jitter_percent` percent of random extra wait.
pub(crate) fn jitter_wait(base: Duration, jitter_percent: u8) -> Duration {
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let jitter_range = if jitter_percent == 0 {
        1
    } else {
        std::cmp::max(1, base_ms.saturating_mul(u64::from(jitter_percent)) / 100)
    };
    let mut rng = rand::rng();
    Duration::from_millis(base_ms.saturating_add(rng.random_range(0..jitter_range)))
}

/// Await `fut`, failing with `RequestTimeout(capability)` if `deadline` elapses first.
pub(crate) async fn with_request_deadline<T, Fut>(
    capability: &str,
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, IntrabarError>
where
    Fut: core::future::Future<Output = Result<T, IntrabarError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .unwrap_or_else(|_| Err(IntrabarError::request_timeout(capability))),
        None => fut.await,
    }
}

impl Intrabar {
    /// Start building a new `Intrabar` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use intrabar::{Intrabar, RetryConfig};
    /// use intrabar_google::GoogleConnector;
    ///
    /// let google = Arc::new(GoogleConnector::builder().build()?);
    /// let intrabar = Intrabar::builder()
    ///     .with_connector(google)
    ///     .prefer(GoogleConnector::KEY)
    ///     .retry(RetryConfig::default())
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> IntrabarBuilder {
        IntrabarBuilder::new()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &IntrabarConfig {
        &self.cfg
    }

    /// Connectors in routing order: the preferred one first, then registration order.
    pub(crate) fn ordered(&self) -> Vec<&Arc<dyn IntrabarConnector>> {
        let mut out: Vec<&Arc<dyn IntrabarConnector>> = self.connectors.iter().collect();
        if let Some(key) = self.preferred {
            out.sort_by_key(|c| c.key() != key);
        }
        out
    }

    /// Fetch an intraday candle series for `symbol`.
    ///
    /// Behavior and trade-offs:
    /// - Uses the preferred connector when it offers intraday data, otherwise the first
    ///   registered connector that does. There is no cross-provider fallback: a symbol is
    ///   served by exactly one provider.
    /// - Each attempt is bounded by `provider_timeout`; transient failures are retried
    ///   per the retry policy.
    ///
    /// # Errors
    /// - `Unsupported("intraday")` when no connector offers intraday data.
    /// - Decode errors (`MalformedSequence`, `UnrecognizedRowFormat`), `NotFound` and
    ///   `InvalidArg` from the provider, unchanged and without retries.
    /// - The last transient error when retries are disabled, or `RetriesExhausted`
    ///   once the retry budget is spent.
    /// - `RequestTimeout` if the configured request deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "intrabar::core::intraday",
            skip(self, symbol, req),
            fields(symbol = %symbol, interval_secs = req.interval.as_secs_f64()),
        )
    )]
    pub async fn intraday(
        &self,
        symbol: &str,
        req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError> {
        with_request_deadline(
            "intraday",
            self.cfg.request_timeout,
            self.fetch_intraday(symbol, req),
        )
        .await
    }

    /// Routing and retries for one intraday request, without the request deadline.
    pub(crate) async fn fetch_intraday(
        &self,
        symbol: &str,
        req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError> {
        let (name, provider) = self
            .ordered()
            .into_iter()
            .find_map(|c| c.as_intraday_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| IntrabarError::unsupported("intraday"))?;

        let series = self
            .call_with_retries(name, "intraday", move || {
                Self::intraday_attempt(provider, symbol, req)
            })
            .await?;

        #[cfg(feature = "tracing")]
        if let (Some(step), Some(expected)) = (
            intrabar_core::estimate_step_seconds(&series.candles),
            series.interval.whole_secs(),
        ) && u64::try_from(step).ok() != Some(expected)
        {
            tracing::warn!(
                symbol = %symbol,
                connector = name,
                observed_step = step,
                expected_step = expected,
                "decoded candle cadence differs from the series interval"
            );
        }

        Ok(series)
    }

    async fn intraday_attempt(
        provider: &dyn IntradayProvider,
        symbol: &str,
        req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError> {
        provider.intraday(symbol, req).await
    }

    /// Fetch ticks for `symbol` over the request's date range.
    ///
    /// Routing, timeouts and retries follow [`Self::intraday`].
    ///
    /// # Errors
    /// `Unsupported("ticks")` when no connector offers tick data, otherwise as
    /// [`Self::intraday`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "intrabar::core::ticks",
            skip(self, symbol, req),
            fields(symbol = %symbol, start = %req.start(), end = %req.end()),
        )
    )]
    pub async fn ticks(&self, symbol: &str, req: &TickRequest) -> Result<TickSeries, IntrabarError> {
        let (name, provider) = self
            .ordered()
            .into_iter()
            .find_map(|c| c.as_tick_provider().map(|p| (c.name(), p)))
            .ok_or_else(|| IntrabarError::unsupported("ticks"))?;

        with_request_deadline(
            "ticks",
            self.cfg.request_timeout,
            self.call_with_retries(name, "ticks", move || {
                Self::ticks_attempt(provider, symbol, req)
            }),
        )
        .await
    }

    async fn ticks_attempt(
        provider: &dyn TickProvider,
        symbol: &str,
        req: &TickRequest,
    ) -> Result<TickSeries, IntrabarError> {
        provider.ticks(symbol, req).await
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "intrabar::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, IntrabarError>
    where
        Fut: core::future::Future<Output = Result<T, IntrabarError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(IntrabarError::provider_timeout(connector_name, capability)))
    }

    /// Run `call` until it succeeds, fails permanently, or the retry budget is spent.
    async fn call_with_retries<T, F, Fut>(
        &self,
        connector_name: &'static str,
        capability: &'static str,
        call: F,
    ) -> Result<T, IntrabarError>
    where
        F: Fn() -> Fut,
        Fut: core::future::Future<Output = Result<T, IntrabarError>>,
    {
        let policy = self.cfg.retry;
        let mut attempt: u32 = 0;
        loop {
            let res = Self::provider_call_with_timeout(
                connector_name,
                capability,
                self.cfg.provider_timeout,
                call(),
            )
            .await;
            let err = match res {
                Ok(v) => return Ok(v),
                Err(e) => tag_err(connector_name, e),
            };

            if !err.is_retryable() {
                return Err(err);
            }
            if attempt >= policy.retry_count {
                if policy.retry_count == 0 {
                    return Err(err);
                }
                return Err(IntrabarError::RetriesExhausted {
                    attempts: attempt + 1,
                    last: Box::new(err),
                });
            }

            let wait = jitter_wait(policy.delay_for(attempt), policy.jitter_percent);
            #[cfg(feature = "tracing")]
            tracing::warn!(
                connector = connector_name,
                capability = capability,
                attempt = attempt + 1,
                wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "transient provider failure; retrying"
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}
