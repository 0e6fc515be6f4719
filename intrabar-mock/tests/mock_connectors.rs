use std::time::Duration;

use chrono::NaiveDate;
use intrabar_core::connector::IntrabarConnector;
use intrabar_core::{Interval, IntrabarError, IntradayRequest, TickRequest};
use intrabar_mock::{DynamicMockConnector, MockBehavior, MockConnector};

#[tokio::test]
async fn fixtures_decode_through_anchor_rows() {
    let mock = MockConnector::new();
    let p = mock.as_intraday_provider().unwrap();
    let series = p
        .intraday("GOOG", &IntradayRequest::new(Interval::MINUTE))
        .await
        .unwrap();
    let ts: Vec<i64> = series.candles.iter().map(|c| c.ts.timestamp()).collect();
    assert_eq!(
        ts,
        [
            1_455_892_200,
            1_455_892_260,
            1_455_892_320,
            1_455_892_440,
            1_456_151_400,
            1_456_151_460
        ]
    );
}

#[tokio::test]
async fn special_symbols() {
    let mock = MockConnector::new();
    let p = mock.as_intraday_provider().unwrap();
    let req = IntradayRequest::new(Interval::MINUTE);

    assert!(p.intraday("FAIL", &req).await.unwrap_err().is_retryable());
    assert_eq!(
        p.intraday("BROKEN", &req).await.unwrap_err(),
        IntrabarError::MalformedSequence { row: 0 }
    );
    assert!(matches!(
        p.intraday("GARBLED", &req).await.unwrap_err(),
        IntrabarError::UnrecognizedRowFormat { row: 1, .. }
    ));
    assert!(matches!(
        p.intraday("ZZZZ", &req).await.unwrap_err(),
        IntrabarError::NotFound { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn timeout_symbol_sleeps() {
    let mock = MockConnector::new();
    let p = mock.as_intraday_provider().unwrap();
    let req = IntradayRequest::new(Interval::MINUTE);
    let res = tokio::time::timeout(Duration::from_millis(50), p.intraday("TIMEOUT", &req)).await;
    assert!(res.is_err());
}

#[tokio::test]
async fn tick_fixtures_respect_range() {
    let mock = MockConnector::new();
    let p = mock.as_tick_provider().unwrap();
    let req = TickRequest::new(
        NaiveDate::from_ymd_opt(2014, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2014, 1, 31).unwrap(),
    )
    .unwrap();
    let series = p.ticks("AUD/USD", &req).await.unwrap();
    assert_eq!(series.symbol, "AUDUSD");
    assert_eq!(series.ticks.len(), 3);
}

#[tokio::test]
async fn dynamic_fail_times_then_recovers() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    let fixture = MockConnector::new()
        .as_intraday_provider()
        .unwrap()
        .intraday("AAPL", &IntradayRequest::new(Interval::MINUTE))
        .await
        .unwrap();
    ctl.set_intraday_behavior(
        "AAPL",
        MockBehavior::FailTimes {
            failures: 2,
            error: IntrabarError::connector("dyn", "flaky"),
            value: fixture.clone(),
        },
    )
    .await;

    let p = conn.as_intraday_provider().unwrap();
    let req = IntradayRequest::new(Interval::MINUTE);
    assert!(p.intraday("AAPL", &req).await.is_err());
    assert!(p.intraday("AAPL", &req).await.is_err());
    assert_eq!(p.intraday("AAPL", &req).await.unwrap(), fixture);
    assert_eq!(ctl.intraday_calls("AAPL").await, 3);

    // No rule configured.
    assert!(matches!(
        p.intraday("MSFT", &req).await.unwrap_err(),
        IntrabarError::Unsupported { .. }
    ));

    ctl.clear_all_behaviors().await;
    assert_eq!(ctl.intraday_calls("AAPL").await, 0);
}
