use std::collections::HashSet;

use crate::Intrabar;
use crate::router::util::join_with_deadline;
use intrabar_types::{
    DownloadEntry, DownloadReport, DownloadResponse, IntrabarError, IntradayRequest,
    SymbolWarning,
};

/// Builder to orchestrate intraday downloads for multiple symbols.
pub struct DownloadBuilder<'a> {
    pub(crate) intrabar: &'a Intrabar,
    pub(crate) symbols: Vec<String>,
    pub(crate) request: Option<IntradayRequest>,
}

impl<'a> DownloadBuilder<'a> {
    /// Create a new builder bound to an `Intrabar` instance.
    ///
    /// Starts with no symbols and no request; both must be supplied before `run()`.
    #[must_use]
    pub const fn new(intrabar: &'a Intrabar) -> Self {
        Self {
            intrabar,
            symbols: Vec::new(),
            request: None,
        }
    }

    /// Replace the symbol list.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the list contains the same symbol twice.
    pub fn symbols(mut self, symbols: &[&str]) -> Result<Self, IntrabarError> {
        let mut seen = HashSet::new();
        for s in symbols {
            if !seen.insert(*s) {
                return Err(IntrabarError::InvalidArg(format!(
                    "duplicate symbol '{s}' in symbols list"
                )));
            }
        }

        self.symbols = symbols.iter().map(|s| (*s).to_string()).collect();
        Ok(self)
    }

    /// Append a single symbol.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the symbol is already in the list.
    pub fn add_symbol(mut self, symbol: impl Into<String>) -> Result<Self, IntrabarError> {
        let symbol = symbol.into();
        if self.symbols.contains(&symbol) {
            return Err(IntrabarError::InvalidArg(format!(
                "duplicate symbol '{symbol}' already exists in symbols list"
            )));
        }
        self.symbols.push(symbol);
        Ok(self)
    }

    /// Set the intraday request shared by every symbol.
    #[must_use]
    pub fn request(mut self, req: IntradayRequest) -> Self {
        self.request = Some(req);
        self
    }

    /// Fetch every symbol concurrently and aggregate the results.
    ///
    /// Behavior and trade-offs:
    /// - Each symbol goes through the same routing, timeouts and retries as
    ///   [`Intrabar::intraday`].
    /// - A failing symbol becomes a [`SymbolWarning`] and never aborts the rest of the
    ///   batch; entries keep the order in which symbols were given.
    /// - `response` is `None` only when every symbol failed.
    ///
    /// # Errors
    /// Returns an error only if no symbols or no request were specified, or if the
    /// request-level timeout elapses before all symbols complete.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "intrabar::download::run",
            skip(self),
            fields(symbols = self.symbols.len()),
        )
    )]
    pub async fn run(self) -> Result<DownloadReport, IntrabarError> {
        if self.symbols.is_empty() {
            return Err(IntrabarError::InvalidArg(
                "no symbols specified for download".into(),
            ));
        }
        let req = self.request.ok_or_else(|| {
            IntrabarError::InvalidArg("no intraday request specified for download".into())
        })?;

        let intrabar = self.intrabar;
        let req = &req;
        let tasks = self.symbols.into_iter().map(move |symbol| async move {
            let res = intrabar.fetch_intraday(&symbol, req).await;
            (symbol, res)
        });

        let joined = join_with_deadline(tasks, intrabar.cfg.request_timeout)
            .await
            .map_err(|_| IntrabarError::request_timeout("download:intraday"))?;

        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        for (symbol, result) in joined {
            match result {
                Ok(series) => entries.push(DownloadEntry { symbol, series }),
                Err(error) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        symbol = %symbol,
                        error = %error,
                        "symbol failed during download"
                    );
                    warnings.push(SymbolWarning { symbol, error });
                }
            }
        }

        let response = if entries.is_empty() {
            None
        } else {
            Some(DownloadResponse { entries })
        };

        Ok(DownloadReport { response, warnings })
    }
}

impl Intrabar {
    /// Begin building a multi-symbol intraday download.
    ///
    /// Typical usage: chain `symbols` and `request`, then call `run()`.
    #[must_use]
    pub const fn download(&'_ self) -> DownloadBuilder<'_> {
        DownloadBuilder::new(self)
    }
}
