use excuse_desk::{
    asset_cache::AssetCache, load_theme, router, AppState, ClientConfig, ClientSession,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = ClientConfig::from_env();
    info!(api_base = %config.api_base, asset_origin = %config.asset_origin, "starting page shell");

    let theme = load_theme(&config.theme_path).await;
    let session = ClientSession::new(&config, theme);
    let state = AppState::new(session, AssetCache::new(config.asset_origin.clone()));

    let assets = Arc::clone(&state.assets);
    tokio::spawn(async move {
        assets.install().await;
    });

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
