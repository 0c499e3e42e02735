//! The oracle port: one prompt in, free text out.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// One oracle call: fixed instructions plus the caller's raw text.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub temperature: f32,
}

/// Failure talking to the oracle.
///
/// Callers treat every variant as the same class (an unexpected upstream
/// failure); the variants only sharpen log messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("oracle transport error: {0}")]
    Transport(String),

    /// Non-success reply. `body` is kept for logs only and stays out of the
    /// message, since providers echo credential fragments in it.
    #[error("oracle returned HTTP {status}")]
    Status { status: u16, body: String },

    #[error("oracle reply had an unexpected shape: {0}")]
    Shape(String),

    #[error("oracle did not answer within {0} ms")]
    Timeout(u128),
}

/// External text-to-text oracle (a hosted LLM).
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError>;
}

#[async_trait]
impl<O> Oracle for Arc<O>
where
    O: Oracle + ?Sized,
{
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        (**self).complete(request).await
    }
}

/// Oracle that always answers with the same text (offline runs and tests).
#[derive(Debug, Clone)]
pub struct StaticOracle {
    pub response: String,
}

impl StaticOracle {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl Oracle for StaticOracle {
    async fn complete(&self, _request: OracleRequest) -> Result<String, OracleError> {
        Ok(self.response.clone())
    }
}
