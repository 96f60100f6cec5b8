use anyhow::Context;
use arrshim::config::ShimConfig;
use arrshim::server::build_router;
use arrshim::util::{init_tracing, AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ShimConfig::from_env().context("invalid configuration")?;

    tracing::info!(mode = %config.mode, dry_run = config.dry_run, "starting arrshim");
    if config.api_key.is_empty() {
        tracing::warn!("SHIM_API_KEY is empty; all requests are accepted unauthenticated");
    }
    if config.overseerr.is_configured() {
        tracing::info!(url = %config.overseerr.base_url, user_id = config.overseerr.user_id, "Overseerr configured");
    } else {
        tracing::warn!("Overseerr not configured (OVERSEERR_URL/OVERSEERR_API_KEY); add/import calls will fail");
    }
    if !config.tmdb.is_configured() {
        tracing::warn!("TMDB_API_KEY not set; tvdb->tmdb bridging and lookups are disabled");
    }
    tracing::debug!(?config, "effective configuration");

    let addr = config.bind_addr.clone();
    let app = build_router(AppState::new(config));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("arrshim listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
