//! Axum application wiring.
//!
//! - `services.rs`: control-plane wiring (oracle, translator, dispatcher)
//! - `routes/`: HTTP handlers (one file per surface)
//! - `dto.rs`: request DTOs
//! - `errors.rs`: consistent error responses
//! - `openapi.rs`: API descriptions served at `/openapi.json`

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use stockline_inventory::InMemoryStockLedger;

pub mod dto;
pub mod errors;
pub mod openapi;
pub mod routes;
pub mod services;

use services::ControlPlaneServices;

/// Router of the inventory service (stock ledger over HTTP).
pub fn build_inventory_app(ledger: Arc<InMemoryStockLedger>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/openapi.json", get(openapi::inventory_openapi))
        .merge(routes::inventory::router())
        .layer(Extension(ledger))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Router of the control plane (natural-language queries).
pub fn build_control_plane_app(services: Arc<ControlPlaneServices>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .route("/openapi.json", get(openapi::control_plane_openapi))
        .merge(routes::query::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
