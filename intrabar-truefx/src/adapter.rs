#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use intrabar_core::IntrabarError;

use crate::archive::archive_url;

/// Monthly archive download abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait TrueFxArchive: Send + Sync {
    /// Download the zipped archive for `symbol` (normalized) and month.
    async fn fetch_month(
        &self,
        symbol: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<u8>, IntrabarError>;
}

/// Real adapter backed by a `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct RealAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl RealAdapter {
    /// Wrap an existing client and archive root.
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

fn map_status(status: StatusCode, context: &str) -> IntrabarError {
    match status {
        StatusCode::NOT_FOUND => IntrabarError::not_found(context.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            IntrabarError::connector("intrabar-truefx", format!("rate limit: {context}"))
        }
        s => IntrabarError::connector("intrabar-truefx", format!("status {s}: {context}")),
    }
}

fn map_http_err(e: &reqwest::Error, context: &str) -> IntrabarError {
    match e.status() {
        Some(status) => map_status(status, context),
        None => IntrabarError::connector("intrabar-truefx", format!("{context}: {e}")),
    }
}

#[async_trait]
impl TrueFxArchive for RealAdapter {
    async fn fetch_month(
        &self,
        symbol: &str,
        year: i32,
        month: u32,
    ) -> Result<Vec<u8>, IntrabarError> {
        let url = archive_url(&self.base_url, symbol, year, month)?;
        let context = format!("ticks for {symbol} {year}-{month:02}");

        #[cfg(feature = "tracing")]
        tracing::debug!(url = %url, "downloading tick archive");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_http_err(&e, &context))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status, &context));
        }
        let bytes = resp.bytes().await.map_err(|e| map_http_err(&e, &context))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(feature = "test-adapters")]
impl dyn TrueFxArchive {
    /// Build a `TrueFxArchive` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn TrueFxArchive>
    where
        F: Send + Sync + 'static + Fn(String, i32, u32) -> Result<Vec<u8>, IntrabarError>,
    {
        struct FnArchive<F>(F);
        #[async_trait]
        impl<F> TrueFxArchive for FnArchive<F>
        where
            F: Send + Sync + 'static + Fn(String, i32, u32) -> Result<Vec<u8>, IntrabarError>,
        {
            async fn fetch_month(
                &self,
                symbol: &str,
                year: i32,
                month: u32,
            ) -> Result<Vec<u8>, IntrabarError> {
                (self.0)(symbol.to_string(), year, month)
            }
        }
        Arc::new(FnArchive(f))
    }
}
