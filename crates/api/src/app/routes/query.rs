use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use stockline_core::StockSnapshot;

use crate::app::services::ControlPlaneServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/query", post(handle_query))
}

/// Interpret a free-text query and run it against the ledger.
#[utoipa::path(
    post,
    path = "/query",
    tag = "query",
    request_body = dto::QueryRequest,
    responses(
        (status = 200, description = "Quantities after the query ran", body = StockSnapshot),
        (status = 400, description = "Unparseable query or rejected stock change", body = dto::ErrorBody),
        (status = 422, description = "Missing or mistyped field", body = dto::ErrorBody),
        (status = 500, description = "Oracle or inventory service failure", body = dto::ErrorBody)
    )
)]
pub async fn handle_query(
    Extension(services): Extension<Arc<ControlPlaneServices>>,
    payload: Result<Json<dto::QueryRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };

    match services.handle_query(&body.user_query).await {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => errors::dispatch_error_to_response(e),
    }
}
