use std::sync::Arc;

use anyhow::Context;

use tenant_gate_api::config::GatewayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env().context("failed to load configuration")?;
    tenant_gate_observability::init(config.log.format);

    let directory = Arc::new(config.dev_directory());
    if directory.is_empty() {
        tracing::warn!("no dev_users configured; logins will fail until a user directory is wired in");
    }

    let app = tenant_gate_api::app::build_app(&config, directory)?;

    let addr = config.http_server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
