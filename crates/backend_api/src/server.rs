use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{repository::FinanceRepository, router::create_router};

/// Initialize tracing with `RUST_LOG`, falling back to verbose server defaults
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend_api=debug,tower_http=debug,axum=trace".into()),
        )
        .init();
}

/// Run the API server until ctrl-c
pub async fn run_server(
    repo: Arc<dyn FinanceRepository>,
    static_dir: Option<PathBuf>,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_router(repo, static_dir);

    let addr = format!("{}:{}", host, port).parse::<SocketAddr>()?;
    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
