//! Stock ledger port and its adapters.
//!
//! The control plane talks to the ledger through [`StockLedger`]:
//! - in-process: [`InMemoryStockLedger`] (tests, single-binary setups)
//! - remote: [`HttpStockLedger`] against the inventory service's `/inventory`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use stockline_core::{ChangeRequest, StockError, StockSnapshot};
use stockline_inventory::InMemoryStockLedger;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Business rejection from an in-process ledger.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Client-error response from a remote ledger.
    #[error("{detail}")]
    Rejected { code: String, detail: String },

    /// The ledger could not be reached or answered nonsense.
    #[error("inventory service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait StockLedger: Send + Sync {
    async fn snapshot(&self) -> Result<StockSnapshot, LedgerError>;
    async fn apply(&self, request: &ChangeRequest) -> Result<StockSnapshot, LedgerError>;
}

#[async_trait]
impl<L> StockLedger for Arc<L>
where
    L: StockLedger + ?Sized,
{
    async fn snapshot(&self) -> Result<StockSnapshot, LedgerError> {
        (**self).snapshot().await
    }

    async fn apply(&self, request: &ChangeRequest) -> Result<StockSnapshot, LedgerError> {
        (**self).apply(request).await
    }
}

#[async_trait]
impl StockLedger for InMemoryStockLedger {
    async fn snapshot(&self) -> Result<StockSnapshot, LedgerError> {
        Ok(self.get())
    }

    async fn apply(&self, request: &ChangeRequest) -> Result<StockSnapshot, LedgerError> {
        Ok(self.apply_request(request)?)
    }
}

/// Error body returned by the inventory service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    error: Option<String>,
}

/// Remote ledger reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStockLedger {
    client: reqwest::Client,
    url: String,
}

impl HttpStockLedger {
    /// `url` is the full `/inventory` resource, e.g. `http://localhost:8000/inventory`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn read_snapshot(response: reqwest::Response) -> Result<StockSnapshot, LedgerError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                LedgerError::Unavailable(format!("unexpected inventory response: {e}"))
            });
        }

        if status.is_client_error() {
            let parsed: Option<ErrorBody> = serde_json::from_str(&body).ok();
            let (code, detail) = match parsed {
                Some(ErrorBody { detail, error }) => (error, detail),
                None => (None, None),
            };
            return Err(LedgerError::Rejected {
                code: code.unwrap_or_else(|| "ledger_rejected".to_string()),
                detail: detail.unwrap_or(body),
            });
        }

        Err(LedgerError::Unavailable(format!("HTTP {status}: {body}")))
    }
}

#[async_trait]
impl StockLedger for HttpStockLedger {
    async fn snapshot(&self) -> Result<StockSnapshot, LedgerError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        Self::read_snapshot(response).await
    }

    async fn apply(&self, request: &ChangeRequest) -> Result<StockSnapshot, LedgerError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        Self::read_snapshot(response).await
    }
}
