use std::sync::Arc;
use std::time::Duration;

use crate::helpers::{AAPL, fast_retry, minute_request};
use intrabar::{Intrabar, IntrabarError, RetryConfig};
use intrabar_mock::{DynamicMockConnector, MockBehavior, MockConnector};

#[tokio::test(start_paused = true)]
async fn hanging_provider_hits_provider_timeout() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(AAPL, MockBehavior::Hang).await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(RetryConfig::none())
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert_eq!(err, IntrabarError::provider_timeout("dyn", "intraday"));
}

#[tokio::test(start_paused = true)]
async fn provider_timeouts_count_as_transient() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(AAPL, MockBehavior::Hang).await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(fast_retry(2))
        .provider_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert!(matches!(err, IntrabarError::RetriesExhausted { attempts: 3, .. }));
    assert_eq!(ctl.intraday_calls(AAPL).await, 3);
}

#[tokio::test(start_paused = true)]
async fn request_deadline_bounds_the_retry_loop() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(AAPL, MockBehavior::Hang).await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(fast_retry(10))
        .provider_timeout(Duration::from_secs(1))
        .request_timeout(Duration::from_millis(1500))
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert_eq!(err, IntrabarError::request_timeout("intraday"));
    assert_eq!(ctl.intraday_calls(AAPL).await, 2);
}

#[tokio::test(start_paused = true)]
async fn slow_mock_symbol_succeeds_within_timeout() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .provider_timeout(MockConnector::TIMEOUT_DELAY * 2)
        .build()
        .unwrap();

    let s = ib.intraday("TIMEOUT", &minute_request()).await.unwrap();
    assert!(!s.candles.is_empty());
}
