mod config;
mod errors;
mod models;
mod routes;
mod service;

use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::service::delivery;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "melt=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();

    // ── Client (SPA) ──────────────────────────────────────────────────────────
    // Unknown paths are client-side routes, so they get the app shell.
    let serve_client = ServeDir::new(&config.client_dir)
        .not_found_service(ServeFile::new(config.client_dir.join("index.html")));

    // ── Router ────────────────────────────────────────────────────────────────
    let app = routes::router(delivery::Handle::new()).fallback_service(serve_client);

    // The dev client is served from its own origin.
    #[cfg(debug_assertions)]
    let app = {
        use axum::http::{HeaderValue, Method};
        use tower_http::cors::CorsLayer;

        let origin = config.dev_client_origin.parse::<HeaderValue>()?;
        app.layer(CorsLayer::new().allow_origin(origin).allow_methods([Method::GET]))
    };

    let app = app.layer(TraceLayer::new_for_http());

    // ── Listen ────────────────────────────────────────────────────────────────
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{addr}/ (client from {})", config.client_dir.display());

    axum::serve(listener, app).await?;
    Ok(())
}
