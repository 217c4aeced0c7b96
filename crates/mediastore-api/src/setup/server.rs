//! Server startup and graceful shutdown

use anyhow::Result;
use axum::Router;
use mediastore_core::Config;

/// Start the server with graceful shutdown
pub async fn start_server(config: &Config, app: Router) -> Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port());
    tracing::info!(addr = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let mib = 1024 * 1024;
    tracing::info!(
        avatar_max_mb = config.media.avatar_max_bytes / mib,
        gallery_max_mb = config.media.gallery_max_bytes / mib,
        video_max_mb = config.media.video_max_bytes / mib,
        image_extensions = %config.media.image_allowed_extensions.join(","),
        video_extensions = %config.media.video_allowed_extensions.join(","),
        upload_dir = %config.upload_dir,
        geocoding_enabled = config.geocoder.enabled,
        "Server ready and accepting connections"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on SIGINT or SIGTERM. In-flight uploads finish before the
/// listener closes.
///
/// # Panics
/// If a signal handler cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Draining in-flight requests");

    crate::telemetry::shutdown_telemetry().await;
}
