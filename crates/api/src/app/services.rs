//! Control-plane wiring: oracle → translator → dispatcher → ledger.
//!
//! Each query walks a small per-request state machine, logged on a span that
//! carries a UUIDv7 `request_id`:
//!
//! ```text
//! Received → Translating → Dispatching → Fulfilled | Failed
//!                        ↘ Rejected    → Failed
//! ```
//!
//! Nothing is retried and nothing survives the request.

use std::sync::Arc;

use anyhow::Context;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use stockline_ai::{
    HttpOracle, HttpOracleConfig, IntentTranslator, Oracle, ParsedIntent, TranslatorConfig,
};
use stockline_core::StockSnapshot;
use stockline_infra::{ActionDispatcher, ControlPlaneConfig, DispatchError, HttpStockLedger, StockLedger};

pub const EMPTY_QUERY_MESSAGE: &str = "Could not understand an empty query. Please describe what you want to check or change.";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum QueryPhase {
    Received,
    Translating,
    Dispatching,
    Rejected,
    Fulfilled,
    Failed,
}

impl QueryPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryPhase::Received => "received",
            QueryPhase::Translating => "translating",
            QueryPhase::Dispatching => "dispatching",
            QueryPhase::Rejected => "rejected",
            QueryPhase::Fulfilled => "fulfilled",
            QueryPhase::Failed => "failed",
        }
    }
}

pub struct ControlPlaneServices {
    translator: IntentTranslator<Arc<dyn Oracle>>,
    dispatcher: ActionDispatcher<Arc<dyn StockLedger>>,
}

impl ControlPlaneServices {
    pub fn new(
        oracle: Arc<dyn Oracle>,
        ledger: Arc<dyn StockLedger>,
        translator_config: TranslatorConfig,
    ) -> Self {
        Self {
            translator: IntentTranslator::new(oracle, translator_config),
            dispatcher: ActionDispatcher::new(ledger),
        }
    }

    /// Run one natural-language query end to end.
    pub async fn handle_query(&self, user_query: &str) -> Result<StockSnapshot, DispatchError> {
        let request_id = Uuid::now_v7();
        let span = info_span!("query", %request_id);
        self.run(user_query).instrument(span).await
    }

    async fn run(&self, user_query: &str) -> Result<StockSnapshot, DispatchError> {
        enter(QueryPhase::Received);

        if user_query.trim().is_empty() {
            enter(QueryPhase::Rejected);
            return fail(DispatchError::UnparseableQuery(EMPTY_QUERY_MESSAGE.to_string()));
        }

        enter(QueryPhase::Translating);
        let intent = match self.translator.translate(user_query).await {
            Ok(intent) => intent,
            Err(e) => return fail(e.into()),
        };

        enter(match intent {
            ParsedIntent::Unrecognized(_) => QueryPhase::Rejected,
            _ => QueryPhase::Dispatching,
        });

        match self.dispatcher.dispatch(intent).await {
            Ok(snapshot) => {
                enter(QueryPhase::Fulfilled);
                Ok(snapshot)
            }
            Err(e) => fail(e),
        }
    }
}

fn enter(phase: QueryPhase) {
    info!(phase = phase.as_str(), "query phase");
}

fn fail(err: DispatchError) -> Result<StockSnapshot, DispatchError> {
    warn!(
        phase = QueryPhase::Failed.as_str(),
        code = err.code(),
        client_error = err.is_client_error(),
        error = %err,
        "query phase"
    );
    Err(err)
}

/// Build control-plane services against the hosted oracle and a remote ledger.
pub fn build_services(config: &ControlPlaneConfig) -> anyhow::Result<ControlPlaneServices> {
    if config.oracle.api_key.is_none() {
        warn!("OPENAI_API_KEY not set; oracle calls will likely be rejected");
    }

    let oracle = HttpOracle::new(HttpOracleConfig {
        endpoint: config.oracle.endpoint.clone(),
        api_key: config.oracle.api_key.clone(),
        timeout: config.oracle.timeout,
    })
    .context("failed to build oracle client")?;

    let ledger = HttpStockLedger::new(config.inventory_url.clone(), config.ledger_timeout)
        .context("failed to build inventory client")?;

    info!(
        oracle = oracle.endpoint(),
        model = %config.oracle.model,
        inventory = ledger.url(),
        "control plane services wired"
    );

    Ok(ControlPlaneServices::new(
        Arc::new(oracle),
        Arc::new(ledger),
        TranslatorConfig {
            model: config.oracle.model.clone(),
            temperature: 0.0,
            timeout: config.oracle.timeout,
        },
    ))
}
