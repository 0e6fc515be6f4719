use std::sync::Arc;

use crate::helpers::{AAPL, fast_retry, minute_request, series};
use intrabar::{Intrabar, IntrabarError, RetryConfig};
use intrabar_mock::{DynamicMockConnector, MockBehavior, MockConnector};
use proptest::prelude::*;

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    let expected = series(AAPL, &[60, 120]);
    ctl.set_intraday_behavior(
        AAPL,
        MockBehavior::FailTimes {
            failures: 2,
            error: IntrabarError::connector("dyn", "503"),
            value: expected.clone(),
        },
    )
    .await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(fast_retry(3))
        .build()
        .unwrap();

    assert_eq!(ib.intraday(AAPL, &minute_request()).await.unwrap(), expected);
    assert_eq!(ctl.intraday_calls(AAPL).await, 3);
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_report_attempts_and_last_error() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(
        AAPL,
        MockBehavior::Fail(IntrabarError::connector("dyn", "502")),
    )
    .await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(fast_retry(2))
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert_eq!(
        err,
        IntrabarError::RetriesExhausted {
            attempts: 3,
            last: Box::new(IntrabarError::connector("dyn", "502")),
        }
    );
    assert_eq!(ctl.intraday_calls(AAPL).await, 3);
}

#[tokio::test(start_paused = true)]
async fn decode_errors_fail_fast() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(fast_retry(5))
        .build()
        .unwrap();

    let broken = ib.intraday("BROKEN", &minute_request()).await.unwrap_err();
    assert_eq!(broken, IntrabarError::MalformedSequence { row: 0 });

    let garbled = ib.intraday("GARBLED", &minute_request()).await.unwrap_err();
    assert!(matches!(
        garbled,
        IntrabarError::UnrecognizedRowFormat { row: 1, ref token } if token == "xyz"
    ));
}

#[tokio::test(start_paused = true)]
async fn decode_errors_are_attempted_once() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(
        AAPL,
        MockBehavior::Fail(IntrabarError::MalformedSequence { row: 0 }),
    )
    .await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(fast_retry(4))
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert_eq!(err, IntrabarError::MalformedSequence { row: 0 });
    assert_eq!(ctl.intraday_calls(AAPL).await, 1);
}

#[tokio::test]
async fn without_retries_the_error_is_not_wrapped() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(RetryConfig::none())
        .build()
        .unwrap();

    let err = ib.intraday("FAIL", &minute_request()).await.unwrap_err();
    assert!(matches!(err, IntrabarError::Connector { .. }));
}

#[tokio::test(start_paused = true)]
async fn opaque_errors_are_tagged_with_the_connector() {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    ctl.set_intraday_behavior(AAPL, MockBehavior::Fail(IntrabarError::Other("eof".into())))
        .await;

    let ib = Intrabar::builder()
        .with_connector(conn)
        .retry(RetryConfig::none())
        .build()
        .unwrap();

    let err = ib.intraday(AAPL, &minute_request()).await.unwrap_err();
    assert_eq!(err, IntrabarError::connector("dyn", "eof"));
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 24, .. ProptestConfig::default() })]
    #[test]
    fn attempts_never_exceed_the_retry_budget(failures in 0u32..6, retry_count in 0u32..5) {
        tokio_test::block_on(async move {
            tokio::time::pause();
            let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
            let expected = series(AAPL, &[60]);
            ctl.set_intraday_behavior(
                AAPL,
                MockBehavior::FailTimes {
                    failures,
                    error: IntrabarError::connector("dyn", "flaky"),
                    value: expected.clone(),
                },
            )
            .await;

            let ib = Intrabar::builder()
                .with_connector(conn)
                .retry(fast_retry(retry_count))
                .build()
                .unwrap();

            let res = ib.intraday(AAPL, &minute_request()).await;
            let calls = ctl.intraday_calls(AAPL).await;
            if failures <= retry_count {
                assert_eq!(res.unwrap(), expected);
                assert_eq!(calls, failures + 1);
            } else {
                assert_eq!(calls, retry_count + 1);
                let err = res.unwrap_err();
                assert_eq!(err.root_cause(), &IntrabarError::connector("dyn", "flaky"));
            }
        });
    }
}
