use std::sync::Arc;

use chrono::NaiveDate;
use intrabar::{ConnectorKey, Intrabar, IntrabarError, RetryConfig, TickRequest};
use intrabar_mock::{DynamicMockConnector, MockBehavior, MockConnector};

use crate::helpers::{bare, fast_retry};

fn january_2014() -> TickRequest {
    TickRequest::new(
        NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2014, 1, 31).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn ticks_are_routed_and_range_filtered() {
    let ib = Intrabar::builder()
        .with_connector(bare("bare"))
        .with_connector(Arc::new(MockConnector::new()))
        .prefer(ConnectorKey::new("bare"))
        .build()
        .unwrap();

    let s = ib.ticks("AUD/USD", &january_2014()).await.unwrap();
    assert_eq!(s.symbol, "AUDUSD");
    assert_eq!(s.ticks.len(), 3);
    assert_eq!(s.ticks[0].ask.to_string(), "0.88922");
}

#[tokio::test]
async fn ticks_unsupported_without_provider() {
    let ib = Intrabar::builder()
        .with_connector(bare("bare"))
        .build()
        .unwrap();
    assert_eq!(
        ib.ticks("EURUSD", &january_2014()).await.unwrap_err(),
        IntrabarError::unsupported("ticks")
    );
}

#[tokio::test(start_paused = true)]
async fn tick_failures_share_the_retry_policy() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_tick_behavior(
        "EURUSD",
        MockBehavior::Fail(IntrabarError::connector("dyn", "archive unavailable")),
    )
    .await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(fast_retry(1))
        .build()
        .unwrap();

    let err = ib.ticks("EURUSD", &january_2014()).await.unwrap_err();
    assert!(matches!(err, IntrabarError::RetriesExhausted { attempts: 2, .. }));
    assert_eq!(ctl.tick_calls("EURUSD").await, 2);

    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(RetryConfig::none())
        .build()
        .unwrap();
    assert!(matches!(
        ib.ticks("GBPJPY", &january_2014()).await.unwrap_err(),
        IntrabarError::NotFound { .. }
    ));
}
