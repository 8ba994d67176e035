use std::sync::Arc;

use anyhow::Context;

use remit_api::app::{build_app, services::AppServices};
use remit_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    remit_observability::init();

    let config = ApiConfig::from_env()?;
    let services = Arc::new(AppServices::in_memory());
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
