use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use signage_core::pdf::PopplerRasterizer;
use signage_store::StorageLayout;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signage_api::config::ServerConfig;
use signage_api::router::build_app_router;
use signage_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "signage_api=debug,signage_store=debug,signage_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        data_dir = %config.data_dir.display(),
        "Loaded server configuration"
    );

    // --- Storage ---
    let layout = StorageLayout::new(&config.data_dir, &config.static_dir);
    layout
        .ensure_dirs()
        .await
        .expect("Failed to create data directories");
    tracing::info!(
        uploads = %layout.uploads_dir.display(),
        converted = %layout.converted_dir.display(),
        static_dir = %layout.static_dir.display(),
        "Data directories ready"
    );

    // --- PDF rasterizer ---
    let rasterizer = Arc::new(PopplerRasterizer::new(
        config.pdf_rasterizer.clone(),
        Duration::from_secs(config.pdf_timeout_secs),
    ));

    // --- App state ---
    let state = AppState::new(config.clone(), layout, rasterizer);

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd or pm2).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
