use std::sync::Arc;

use anyhow::Context;

use stockline_infra::InventoryServiceConfig;
use stockline_inventory::InMemoryStockLedger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    stockline_observability::init("inventory-service");

    let config = InventoryServiceConfig::from_env().context("invalid inventory service configuration")?;
    let ledger = Arc::new(InMemoryStockLedger::new(config.seed.clone()));
    tracing::info!(stock = ?ledger.get(), "stock ledger seeded");

    let app = stockline_api::app::build_inventory_app(ledger);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
