use std::sync::Arc;
use std::time::Duration;

use intrabar::{ConnectorKey, Intrabar, IntrabarConfig, IntrabarError, RetryConfig};
use intrabar_mock::MockConnector;

#[test]
fn build_requires_a_connector() {
    let err = Intrabar::builder().build().err().unwrap();
    assert!(matches!(err, IntrabarError::InvalidArg(_)));
}

#[test]
fn build_rejects_unknown_preference() {
    let err = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .prefer(ConnectorKey::new("nobody"))
        .build()
        .err()
        .unwrap();
    match err {
        IntrabarError::InvalidArg(msg) => assert!(msg.contains("nobody")),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn build_validates_retry_policy_and_timeouts() {
    let bad_retry = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .retry(RetryConfig {
            backoff_factor: 0,
            ..RetryConfig::default()
        })
        .build();
    assert!(matches!(bad_retry, Err(IntrabarError::InvalidArg(_))));

    let zero_timeout = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .provider_timeout(Duration::ZERO)
        .build();
    assert!(matches!(zero_timeout, Err(IntrabarError::InvalidArg(_))));
}

#[test]
fn builder_settings_land_in_config() {
    let ib = Intrabar::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .prefer(ConnectorKey::new("intrabar-mock"))
        .retry(RetryConfig::none())
        .provider_timeout(Duration::from_secs(2))
        .request_timeout(Duration::from_secs(7))
        .build()
        .unwrap();
    assert_eq!(
        ib.config(),
        &IntrabarConfig {
            retry: RetryConfig::none(),
            provider_timeout: Duration::from_secs(2),
            request_timeout: Some(Duration::from_secs(7)),
        }
    );
}
