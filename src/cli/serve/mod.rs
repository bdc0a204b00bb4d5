//! Serve command - runs the HTTP server

use std::net::SocketAddr;
use std::path::PathBuf;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::api::{create_router, RouterOptions};
use crate::config::AppConfig;
use crate::infrastructure::observability::init_metrics;

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let state = crate::create_app_state(&config).await?;
    let options = RouterOptions {
        assets_dir: assets_dir(&config),
        metrics: init_metrics(&config.metrics),
    };
    let app = create_router(state, options);

    let addr = build_socket_addr(&config)?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn assets_dir(config: &AppConfig) -> Option<PathBuf> {
    let dir = PathBuf::from(&config.server.assets_dir);

    if dir.is_dir() {
        Some(dir)
    } else {
        warn!(path = %dir.display(), "Assets directory not found; /assets is disabled");
        None
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_socket_addr() {
        let mut config = AppConfig::default();
        config.server.port = 5000;

        let addr = build_socket_addr(&config).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn test_invalid_host_rejected() {
        let mut config = AppConfig::default();
        config.server.host = "not-an-ip".to_string();

        assert!(build_socket_addr(&config).is_err());
    }

    #[test]
    fn test_missing_assets_dir_disables_route() {
        let mut config = AppConfig::default();
        config.server.assets_dir = "/nonexistent/assets".to_string();

        assert!(assets_dir(&config).is_none());
    }
}
