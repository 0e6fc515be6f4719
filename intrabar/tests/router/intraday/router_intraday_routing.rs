use std::sync::Arc;

use crate::helpers::{AAPL, GOOG, bare, minute_request, series};
use intrabar::{ConnectorKey, Intrabar, IntrabarError};
use intrabar_mock::{DynamicMockConnector, MockBehavior, MockConnector};

#[tokio::test]
async fn decodes_through_the_mock_connector() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let s = ib.intraday(GOOG, &minute_request()).await.unwrap();
    let ts: Vec<i64> = s.candles.iter().map(|c| c.ts.timestamp()).collect();
    assert_eq!(ts[0], 1_455_892_200);
    assert_eq!(ts[3], 1_455_892_200 + 4 * 60);
    assert_eq!(ts[4], 1_456_151_400);
}

#[tokio::test]
async fn unsupported_when_no_connector_serves_intraday() {
    let ib = Intrabar::builder()
        .with_connector(bare("bare"))
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert_eq!(err, IntrabarError::unsupported("intraday"));
}

#[tokio::test]
async fn skips_connectors_without_the_capability() {
    let (dynamic, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(AAPL, MockBehavior::Return(series(AAPL, &[60, 120])))
        .await;

    let ib = Intrabar::builder()
        .with_connector(bare("bare"))
        .with_connector(dynamic)
        .build()
        .unwrap();

    let s = ib.intraday(AAPL, &minute_request()).await.unwrap();
    assert_eq!(s.candles.len(), 2);
    assert_eq!(ctl.intraday_calls(AAPL).await, 1);
}

#[tokio::test]
async fn preferred_connector_wins_over_registration_order() {
    let (first, c_first) = DynamicMockConnector::new_with_controller("first");
    let (second, c_second) = DynamicMockConnector::new_with_controller("second");
    c_first
        .set_intraday_behavior(AAPL, MockBehavior::Return(series(AAPL, &[60])))
        .await;
    c_second
        .set_intraday_behavior(AAPL, MockBehavior::Return(series(AAPL, &[60, 120, 180])))
        .await;

    let ib = Intrabar::builder()
        .with_connector(first)
        .with_connector(second)
        .prefer(ConnectorKey::new("second"))
        .build()
        .unwrap();

    let s = ib.intraday(AAPL, &minute_request()).await.unwrap();
    assert_eq!(s.candles.len(), 3);
    assert_eq!(c_first.intraday_calls(AAPL).await, 0);
    assert_eq!(c_second.intraday_calls(AAPL).await, 1);
}

#[tokio::test]
async fn preferred_connector_without_capability_falls_through() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .with_connector(bare("bare"))
        .prefer(ConnectorKey::new("bare"))
        .build()
        .unwrap();

    assert!(ib.intraday(GOOG, &minute_request()).await.is_ok());
}

#[tokio::test]
async fn not_found_is_returned_unchanged() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap();

    let err = ib.intraday("ZZZZ", &minute_request()).await.unwrap_err();
    assert!(matches!(err, IntrabarError::NotFound { .. }));
}
