//! Routing of parsed intents to the stock ledger.
//!
//! ```text
//! ParsedIntent
//!   ├─ Read          → ledger.snapshot()
//!   ├─ Write         → vocabulary check → ledger.apply()
//!   └─ Unrecognized  → UnparseableQuery (ledger untouched)
//! ```
//!
//! Items are validated here before any ledger call, so a remote ledger never
//! sees an item outside the closed vocabulary.

use thiserror::Error;

use stockline_ai::{OracleError, ParsedIntent};
use stockline_core::{ChangeRequest, Item, StockError, StockSnapshot};

use crate::ledger::{LedgerError, StockLedger};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Stock rule violation (invalid item, insufficient stock, overflow).
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Remote ledger refused the request; its code and detail are kept.
    #[error("{detail}")]
    LedgerRejected { code: String, detail: String },

    /// The oracle's reply could not be reduced to an intent.
    #[error("{0}")]
    UnparseableQuery(String),

    /// Oracle or ledger transport failure.
    #[error("{0}")]
    OracleFailure(String),
}

impl DispatchError {
    /// `true` for bad input (400-class), `false` for unexpected failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DispatchError::OracleFailure(_))
    }

    pub fn code(&self) -> &str {
        match self {
            DispatchError::Stock(e) => e.code(),
            DispatchError::LedgerRejected { code, .. } => code,
            DispatchError::UnparseableQuery(_) => "unparseable_query",
            DispatchError::OracleFailure(_) => "oracle_failure",
        }
    }
}

impl From<LedgerError> for DispatchError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::Stock(e) => DispatchError::Stock(e),
            LedgerError::Rejected { code, detail } => DispatchError::LedgerRejected { code, detail },
            LedgerError::Unavailable(_) => DispatchError::OracleFailure(value.to_string()),
        }
    }
}

impl From<OracleError> for DispatchError {
    fn from(value: OracleError) -> Self {
        DispatchError::OracleFailure(value.to_string())
    }
}

pub struct ActionDispatcher<L: StockLedger> {
    ledger: L,
}

impl<L: StockLedger> ActionDispatcher<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub async fn dispatch(&self, intent: ParsedIntent) -> Result<StockSnapshot, DispatchError> {
        match intent {
            ParsedIntent::Read => Ok(self.ledger.snapshot().await?),
            ParsedIntent::Write(request) => {
                let item = Item::parse(&request.item)?;
                let canonical = ChangeRequest::new(item.as_str(), request.change);
                tracing::info!(item = %item, change = canonical.change, "forwarding stock change");
                Ok(self.ledger.apply(&canonical).await?)
            }
            ParsedIntent::Unrecognized(reason) => Err(DispatchError::UnparseableQuery(reason)),
        }
    }
}
