use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use stockline_core::{ChangeRequest, StockSnapshot};
use stockline_inventory::InMemoryStockLedger;

use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/inventory", get(get_inventory).post(update_inventory))
}

/// Current quantity of every item.
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    responses(
        (status = 200, description = "Quantity per item", body = StockSnapshot)
    )
)]
pub async fn get_inventory(
    Extension(ledger): Extension<Arc<InMemoryStockLedger>>,
) -> axum::response::Response {
    (StatusCode::OK, Json(ledger.get())).into_response()
}

/// Apply a signed change to one item.
#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    request_body = ChangeRequest,
    responses(
        (status = 200, description = "Quantities after the change", body = StockSnapshot),
        (status = 400, description = "Invalid item, insufficient stock or overflow", body = dto::ErrorBody),
        (status = 422, description = "Missing or mistyped field", body = dto::ErrorBody)
    )
)]
pub async fn update_inventory(
    Extension(ledger): Extension<Arc<InMemoryStockLedger>>,
    payload: Result<Json<dto::ChangeStockRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match ledger.apply_request(&body) {
        Ok(snapshot) => {
            tracing::info!(item = %body.item, change = body.change, "inventory updated");
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        Err(e) => {
            tracing::warn!(item = %body.item, change = body.change, error = %e, "inventory update rejected");
            errors::stock_error_to_response(e)
        }
    }
}
