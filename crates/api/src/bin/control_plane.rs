use std::sync::Arc;

use anyhow::Context;

use stockline_infra::ControlPlaneConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    stockline_observability::init("control-plane");

    let config = ControlPlaneConfig::from_env().context("invalid control plane configuration")?;
    let services = Arc::new(stockline_api::app::services::build_services(&config)?);

    let app = stockline_api::app::build_control_plane_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
