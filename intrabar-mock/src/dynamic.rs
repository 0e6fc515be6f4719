use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use intrabar_core::connector::{IntrabarConnector, IntradayProvider, TickProvider};
use intrabar_core::{CandleSeries, IntrabarError, IntradayRequest, TickRequest, TickSeries};

/// Instruction for how a method should behave for a given symbol.
#[derive(Clone, Debug)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(IntrabarError),
    /// Fail the first `failures` calls, then return `value`.
    FailTimes {
        /// Number of calls that fail before the first success.
        failures: u32,
        /// Error returned while failing.
        error: IntrabarError,
        /// Value returned afterwards.
        value: T,
    },
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    intraday_rules: HashMap<String, MockBehavior<CandleSeries>>,
    tick_rules: HashMap<String, MockBehavior<TickSeries>>,
    calls: HashMap<(&'static str, String), u32>,
}

impl InternalState {
    /// Record a call and return its zero-based index for this capability and symbol.
    fn record(&mut self, capability: &'static str, symbol: &str) -> u32 {
        let n = self
            .calls
            .entry((capability, symbol.to_string()))
            .or_insert(0);
        *n += 1;
        *n - 1
    }
}

async fn resolve<T>(
    behavior: Option<MockBehavior<T>>,
    call: u32,
    cap: &str,
) -> Result<T, IntrabarError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::FailTimes {
            failures,
            error,
            value,
        }) => {
            if call < failures {
                Err(error)
            } else {
                Ok(value)
            }
        }
        Some(MockBehavior::Hang) => std::future::pending().await,
        None => Err(IntrabarError::unsupported(cap)),
    }
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
#[derive(Clone)]
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `intraday` calls for a specific symbol.
    pub async fn set_intraday_behavior(
        &self,
        symbol: impl Into<String>,
        behavior: MockBehavior<CandleSeries>,
    ) {
        let mut guard = self.state.lock().await;
        guard.intraday_rules.insert(symbol.into(), behavior);
    }

    /// Set the behavior for `ticks` calls for a specific symbol.
    pub async fn set_tick_behavior(
        &self,
        symbol: impl Into<String>,
        behavior: MockBehavior<TickSeries>,
    ) {
        let mut guard = self.state.lock().await;
        guard.tick_rules.insert(symbol.into(), behavior);
    }

    /// Number of `intraday` calls seen for `symbol`.
    pub async fn intraday_calls(&self, symbol: &str) -> u32 {
        let guard = self.state.lock().await;
        guard
            .calls
            .get(&("intraday", symbol.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Number of `ticks` calls seen for `symbol`.
    pub async fn tick_calls(&self, symbol: &str) -> u32 {
        let guard = self.state.lock().await;
        guard
            .calls
            .get(&("ticks", symbol.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Clear all configured behaviors and call counts.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.intraday_rules.clear();
        guard.tick_rules.clear();
        guard.calls.clear();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn IntrabarConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn IntrabarConnector>, controller)
    }
}

impl IntrabarConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_intraday_provider(&self) -> Option<&dyn IntradayProvider> {
        Some(self as &dyn IntradayProvider)
    }

    fn as_tick_provider(&self) -> Option<&dyn TickProvider> {
        Some(self as &dyn TickProvider)
    }
}

#[async_trait]
impl IntradayProvider for DynamicMockConnector {
    async fn intraday(
        &self,
        symbol: &str,
        _req: &IntradayRequest,
    ) -> Result<CandleSeries, IntrabarError> {
        // Snapshot without holding the lock across await points
        let (behavior, call) = {
            let mut guard = self.state.lock().await;
            let call = guard.record("intraday", symbol);
            (guard.intraday_rules.get(symbol).cloned(), call)
        };
        resolve(behavior, call, "intraday").await
    }
}

#[async_trait]
impl TickProvider for DynamicMockConnector {
    async fn ticks(&self, symbol: &str, _req: &TickRequest) -> Result<TickSeries, IntrabarError> {
        let (behavior, call) = {
            let mut guard = self.state.lock().await;
            let call = guard.record("ticks", symbol);
            (guard.tick_rules.get(symbol).cloned(), call)
        };
        resolve(behavior, call, "ticks").await
    }
}
