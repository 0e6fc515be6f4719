use std::sync::Arc;

use intrabar::{IntrabarConnector, IntrabarError};

fn use_mock() -> bool {
    std::env::var("INTRABAR_EXAMPLES_USE_MOCK").is_ok()
}

/// Install a `fmt` subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[allow(dead_code)]
pub fn intraday_connector() -> Result<Arc<dyn IntrabarConnector>, IntrabarError> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        Ok(Arc::new(intrabar_mock::MockConnector::new()))
    } else {
        Ok(Arc::new(intrabar_google::GoogleConnector::builder().build()?))
    }
}

#[allow(dead_code)]
pub fn tick_connector() -> Result<Arc<dyn IntrabarConnector>, IntrabarError> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        Ok(Arc::new(intrabar_mock::MockConnector::new()))
    } else {
        Ok(Arc::new(intrabar_truefx::TrueFxConnector::new()?))
    }
}
