use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use video_studio::app;
use video_studio::config::settings::AppConfig;
use video_studio::infrastructure::pipeline::CommandPipeline;
use video_studio::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    info!("🎬 Initializing video studio...");

    let config = AppConfig::new();

    // Must exist before the static file service is mounted.
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("failed to create output dir {}", config.output_dir.display())
    })?;

    info!("✨ Loading generation pipeline...");
    let pipeline = match CommandPipeline::load(&config.pipeline) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("❌ Fatal error loading pipeline: {}", e);
            return Err(e).context("pipeline failed to load");
        }
    };

    let state = AppState::new(config.clone(), Arc::new(pipeline));
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind((config.server_host.as_str(), config.server_port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.server_host, config.server_port))?;
    info!("✅ Pipeline ready! Studio running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
