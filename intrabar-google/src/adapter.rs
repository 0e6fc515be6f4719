#[cfg(feature = "test-adapters")]
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use intrabar_core::IntrabarError;

use crate::params::GetPricesParams;

/// Production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.google.com/finance/getprices";

/// Raw body fetch abstraction (so we can inject mocks in tests).
#[async_trait]
pub trait GetPrices: Send + Sync {
    /// Fetch the undecoded response body for `params`.
    async fn fetch(&self, params: &GetPricesParams) -> Result<String, IntrabarError>;
}

/// Real adapter backed by a `reqwest::Client`.
///
/// `reqwest::Client` is reference counted internally, so cloning is cheap.
#[derive(Clone, Debug)]
pub struct RealAdapter {
    client: reqwest::Client,
    base_url: Url,
}

impl RealAdapter {
    /// Wrap an existing client and endpoint.
    #[must_use]
    pub const fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Endpoint this adapter sends requests to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request_url(&self, params: &GetPricesParams) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(params.query_pairs());
        url
    }
}

pub(crate) fn map_status(status: StatusCode, context: &str) -> IntrabarError {
    match status {
        StatusCode::NOT_FOUND => IntrabarError::not_found(context.to_string()),
        StatusCode::TOO_MANY_REQUESTS => {
            IntrabarError::connector("intrabar-google", format!("rate limit: {context}"))
        }
        s if s.is_server_error() => {
            IntrabarError::connector("intrabar-google", format!("server error {s}: {context}"))
        }
        s => IntrabarError::connector("intrabar-google", format!("status {s}: {context}")),
    }
}

pub(crate) fn map_http_err(e: &reqwest::Error, context: &str) -> IntrabarError {
    if let Some(status) = e.status() {
        return map_status(status, context);
    }
    if e.is_timeout() {
        return IntrabarError::connector("intrabar-google", format!("timeout: {context}"));
    }
    IntrabarError::connector("intrabar-google", format!("{context}: {e}"))
}

#[async_trait]
impl GetPrices for RealAdapter {
    async fn fetch(&self, params: &GetPricesParams) -> Result<String, IntrabarError> {
        let context = format!("intraday for {}", params.symbol);
        let resp = self
            .client
            .get(self.request_url(params))
            .send()
            .await
            .map_err(|e| map_http_err(&e, &context))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(map_status(status, &context));
        }
        resp.text().await.map_err(|e| map_http_err(&e, &context))
    }
}

/* -------- Test-only lightweight adapter constructors ------- */

#[cfg(feature = "test-adapters")]
impl dyn GetPrices {
    /// Build a `GetPrices` from a closure (tests only).
    pub fn from_fn<F>(f: F) -> Arc<dyn GetPrices>
    where
        F: Send + Sync + 'static + Fn(GetPricesParams) -> Result<String, IntrabarError>,
    {
        struct FnPrices<F>(F);
        #[async_trait]
        impl<F> GetPrices for FnPrices<F>
        where
            F: Send + Sync + 'static + Fn(GetPricesParams) -> Result<String, IntrabarError>,
        {
            async fn fetch(&self, params: &GetPricesParams) -> Result<String, IntrabarError> {
                (self.0)(params.clone())
            }
        }
        Arc::new(FnPrices(f))
    }
}
