use std::sync::Arc;
use std::time::Duration;

use url::Url;

use intrabar_core::IntrabarError;

use crate::TrueFxConnector;
use crate::adapter::RealAdapter;
use crate::archive::DEFAULT_BASE_URL;

/// Builder for [`TrueFxConnector`].
///
/// `user_agent` and `timeout` configure the internally built client and are
/// ignored when a client is supplied with [`TrueFxConnectorBuilder::http_client`].
#[derive(Debug, Default)]
pub struct TrueFxConnectorBuilder {
    base_url: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl TrueFxConnectorBuilder {
    /// Root of the archive tree (e.g. a mirror or a local mock server).
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

    /// Per-request HTTP timeout. Monthly archives are tens of megabytes.
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
    pub fn build(self) -> Result<TrueFxConnector, IntrabarError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).map_err(|e| IntrabarError::InvalidArg(format!("base url {raw:?}: {e}")))?;

        let client = match self.http_client {
            Some(c) => c,
            None => {
                let mut b = reqwest::Client::builder();
                if let Some(ua) = self.user_agent {
                    b = b.user_agent(ua);
                }
                if let Some(t) = self.timeout {
                    b = b.timeout(t);
                }
                b.build().map_err(|e| IntrabarError::Other(e.to_string()))?
            }
        };

        Ok(TrueFxConnector {
            archive: Arc::new(RealAdapter::new(client, raw.to_string())),
        })
    }
}

impl TrueFxConnector {
    /// Returns an unconfigured builder targeting the public archive.
    #[must_use]
    pub fn builder() -> TrueFxConnectorBuilder {
        TrueFxConnectorBuilder::default()
    }
}
