use std::sync::Arc;
use std::time::Duration;

use url::Url;

use intrabar_core::IntrabarError;

use crate::GoogleConnector;
use crate::adapter::{DEFAULT_BASE_URL, RealAdapter};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Builder for [`GoogleConnector`].
///
/// `user_agent` and `timeout` configure the internally built client and are
/// ignored when a client is supplied with [`GoogleConnectorBuilder::http_client`].
#[derive(Debug, Default)]
pub struct GoogleConnectorBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl GoogleConnectorBuilder {
    /// Override the endpoint (e.g. a local mock server).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the `User-Agent` header.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Per-request HTTP timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the connector.
    ///
    /// # Errors
    /// Returns `InvalidArg` for an unparseable base URL, or `Other` when the
    /// HTTP client cannot be constructed.
    pub fn build(self) -> Result<GoogleConnector, IntrabarError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let base_url = Url::parse(raw)
            .map_err(|e| IntrabarError::InvalidArg(format!("base url {raw:?}: {e}")))?;

        let client = match self.http_client {
            Some(c) => c,
            None => {
                let mut b = reqwest::Client::builder().user_agent(
                    self.user_agent
                        .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                );
                if let Some(t) = self.timeout {
                    b = b.timeout(t);
                }
                b.build().map_err(|e| IntrabarError::Other(e.to_string()))?
            }
        };

        Ok(GoogleConnector::with_prices(Arc::new(RealAdapter::new(
            client, base_url,
        ))))
    }
}

impl GoogleConnector {
    /// Returns an unconfigured builder targeting the production endpoint.
    #[must_use]
    pub fn builder() -> GoogleConnectorBuilder {
        GoogleConnectorBuilder::default()
    }
}
