use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /query`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// Free-text statement or question about stock, e.g. "I sold 2 pants".
    pub user_query: String,
}

/// Body of `POST /inventory` (same wire shape as the ledger's change request).
pub type ChangeStockRequest = stockline_core::ChangeRequest;

// -------------------------
// Response DTOs
// -------------------------

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub detail: String,
    /// Stable machine code such as `insufficient_stock`.
    pub error: String,
}
