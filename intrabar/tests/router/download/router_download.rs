use std::sync::Arc;
use std::time::Duration;

use crate::helpers::{AAPL, GOOG, MSFT, minute_request, series};
use intrabar::{Intrabar, IntrabarError, RetryConfig};
use intrabar_mock::{DynamicMockConnector, MockBehavior, MockConnector};

fn mock_intrabar() -> Intrabar {
    Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(RetryConfig::none())
        .build()
        .unwrap()
}

#[tokio::test]
async fn download_fetches_every_symbol_in_order() {
    let ib = mock_intrabar();
    let report = ib
        .download()
        .symbols(&[MSFT, AAPL, GOOG])
        .unwrap()
        .request(minute_request())
        .run()
        .await
        .unwrap();

    assert!(report.warnings.is_empty());
    let resp = report.response.expect("download response");
    let order: Vec<&str> = resp.entries.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(order, [MSFT, AAPL, GOOG]);
    assert_eq!(resp.get(AAPL).unwrap().candles.len(), 4);
    assert_eq!(resp.get(GOOG).unwrap().candles.len(), 6);
}

#[tokio::test]
async fn failing_symbols_become_warnings() {
    let ib = mock_intrabar();
    let report = ib
        .download()
        .symbols(&[AAPL, "FAIL", "BROKEN", GOOG])
        .unwrap()
        .request(minute_request())
        .run()
        .await
        .unwrap();

    let resp = report.response.expect("partial response");
    assert_eq!(resp.entries.len(), 2);
    assert!(resp.get(AAPL).is_some());
    assert!(resp.get(GOOG).is_some());

    assert_eq!(report.warnings.len(), 2);
    assert_eq!(report.warnings[0].symbol, "FAIL");
    assert!(matches!(report.warnings[0].error, IntrabarError::Connector { .. }));
    assert_eq!(report.warnings[1].symbol, "BROKEN");
    assert_eq!(
        report.warnings[1].error,
        IntrabarError::MalformedSequence { row: 0 }
    );
    assert!(report.warnings[1].to_string().starts_with("BROKEN: "));
}

#[tokio::test]
async fn all_failures_yield_no_response() {
    let ib = mock_intrabar();
    let report = ib
        .download()
        .symbols(&["FAIL", "GARBLED"])
        .unwrap()
        .request(minute_request())
        .run()
        .await
        .unwrap();

    assert!(report.response.is_none());
    assert_eq!(report.warnings.len(), 2);
}

#[tokio::test]
async fn duplicate_symbols_are_rejected() {
    let ib = mock_intrabar();
    assert!(matches!(
        ib.download().symbols(&[AAPL, MSFT, AAPL]),
        Err(IntrabarError::InvalidArg(_))
    ));

    let dup = ib
        .download()
        .add_symbol(AAPL)
        .unwrap()
        .add_symbol(AAPL);
    assert!(matches!(dup, Err(IntrabarError::InvalidArg(_))));
}

#[tokio::test]
async fn run_requires_symbols_and_request() {
    let ib = mock_intrabar();
    let no_symbols = ib.download().request(minute_request()).run().await;
    assert!(matches!(no_symbols, Err(IntrabarError::InvalidArg(_))));

    let no_request = ib.download().add_symbol(AAPL).unwrap().run().await;
    assert!(matches!(no_request, Err(IntrabarError::InvalidArg(_))));
}

#[tokio::test(start_paused = true)]
async fn request_deadline_applies_to_the_whole_batch() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(RetryConfig::none())
        .request_timeout(MockConnector::TIMEOUT_DELAY / 2)
        .build()
        .unwrap();

    let err = ib
        .download()
        .symbols(&[AAPL, "TIMEOUT"])
        .unwrap()
        .request(minute_request())
        .run()
        .await
        .unwrap_err();
    assert_eq!(err, IntrabarError::request_timeout("download:intraday"));
}

#[tokio::test(start_paused = true)]
async fn provider_timeout_only_affects_the_slow_symbol() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(RetryConfig::none())
        .provider_timeout(MockConnector::TIMEOUT_DELAY / 2)
        .build()
        .unwrap();

    let report = ib
        .download()
        .symbols(&[AAPL, "TIMEOUT"])
        .unwrap()
        .request(minute_request())
        .run()
        .await
        .unwrap();

    assert!(report.response.unwrap().get(AAPL).is_some());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(
        report.warnings[0].error,
        IntrabarError::provider_timeout("intrabar-mock", "intraday")
    );
}

#[tokio::test(start_paused = true)]
async fn transient_symbol_recovers_within_a_download() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(
        AAPL,
        MockBehavior::FailTimes {
            failures: 1,
            error: IntrabarError::connector("dyn", "reset"),
            value: series(AAPL, &[60, 120]),
        },
    )
    .await;
    ctl.set_intraday_behavior(MSFT, MockBehavior::Return(series(MSFT, &[60])))
        .await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(RetryConfig {
            retry_count: 1,
            pause: Duration::from_millis(10),
            backoff_factor: 2,
            max_pause: Duration::from_millis(10),
            jitter_percent: 0,
        })
        .build()
        .unwrap();

    let report = ib
        .download()
        .add_symbol(AAPL)
        .unwrap()
        .add_symbol(MSFT)
        .unwrap()
        .request(minute_request())
        .run()
        .await
        .unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(report.response.unwrap().entries.len(), 2);
    assert_eq!(ctl.intraday_calls(AAPL).await, 2);
    assert_eq!(ctl.intraday_calls(MSFT).await, 1);
}
