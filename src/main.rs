use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use salon_console::config::AppConfig;
use salon_console::handlers;
use salon_console::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        api = %config.api_base_url,
        waitlist = %config.waitlist_base_url,
        auth = !config.console_token.is_empty(),
        "console configured"
    );

    let state = Arc::new(AppState::new(config.clone()));

    // Every screen loads its lists once on startup
    let initial = Arc::clone(&state);
    tokio::spawn(async move {
        initial.refresh_all().await;
    });

    let app = handlers::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
