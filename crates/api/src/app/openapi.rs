//! Machine-readable API descriptions, served as `/openapi.json` by each service.

use axum::Json;
use utoipa::OpenApi;

use stockline_core::{ChangeRequest, StockSnapshot};

use crate::app::dto::{ErrorBody, QueryRequest};
use crate::app::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "Inventory API", description = "Stock ledger for tshirts and pants"),
    paths(
        routes::inventory::get_inventory,
        routes::inventory::update_inventory,
    ),
    components(
        schemas(ChangeRequest, StockSnapshot, ErrorBody)
    ),
    tags(
        (name = "inventory", description = "Read and adjust stock quantities")
    )
)]
pub struct InventoryApiDoc;

#[derive(OpenApi)]
#[openapi(
    info(title = "Inventory control plane", description = "Natural-language stock queries"),
    paths(
        routes::query::handle_query,
    ),
    components(
        schemas(QueryRequest, StockSnapshot, ErrorBody)
    ),
    tags(
        (name = "query", description = "Free-text reads and writes of the stock ledger")
    )
)]
pub struct ControlPlaneApiDoc;

pub async fn inventory_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(InventoryApiDoc::openapi())
}

pub async fn control_plane_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ControlPlaneApiDoc::openapi())
}
