//! Serve command - runs the control panel

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::create_router_with_state;
use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::session::SessionService;

/// Arguments for the serve command
#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database file (overrides config)
    #[arg(long)]
    pub db: Option<String>,
}

/// Run the control panel server until Ctrl+C or SIGTERM
pub async fn run(args: ServeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    apply_overrides(&mut config, &args);
    logging::init_logging(&config.logging);

    let state = crate::create_app_state(&config)?;
    let sweeper = config.session.ttl().map(|_| {
        spawn_session_sweeper(Arc::clone(&state.sessions), config.session.sweep_interval())
    });

    let app = create_router_with_state(state);
    let addr = build_socket_addr(&config)?;
    info!("Starting blog panel on {}", addr);

    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }

    info!("Server shutdown complete");

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }

    if let Some(db) = &args.db {
        config.storage.path = db.clone();
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

/// Periodically delete sessions that outlived the configured TTL
fn spawn_session_sweeper(sessions: Arc<SessionService>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);

        loop {
            interval.tick().await;

            if let Err(e) = sessions.sweep_expired(chrono::Utc::now()) {
                warn!(error = %e, "Session sweep failed");
            }
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, KeyValueStore, Partition};
    use crate::infrastructure::storage::RedbStore;

    #[test]
    fn test_apply_overrides() {
        let mut config = AppConfig::default();
        let args = ServeArgs {
            port: Some(8080),
            db: Some("/tmp/panel.db".to_string()),
        };

        apply_overrides(&mut config, &args);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.path, "/tmp/panel.db");
    }

    #[test]
    fn test_build_socket_addr() {
        let config = AppConfig::default();
        let addr = build_socket_addr(&config).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:1337");

        let mut config = AppConfig::default();
        config.server.host = "not-an-ip".to_string();
        assert!(build_socket_addr(&config).is_err());
    }

    #[tokio::test]
    async fn test_session_sweeper_removes_expired() {
        let store: Arc<dyn KeyValueStore> = Arc::new(RedbStore::in_memory().unwrap());
        store
            .put(
                Partition::Cookies,
                "StaleTokenStaleToken",
                br#"{"identity":"old@x.com","issued_at":"2000-01-01T00:00:00Z"}"#,
            )
            .unwrap();

        let sessions =
            Arc::new(SessionService::new(Arc::clone(&store)).with_ttl(Duration::from_secs(60)));
        let live = sessions.issue(&Identity::new("a@x.com").unwrap()).unwrap();

        let handle = spawn_session_sweeper(Arc::clone(&sessions), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(!store.contains(Partition::Cookies, "StaleTokenStaleToken").unwrap());
        assert!(sessions.resolve(live.as_str()).is_some());
    }
}
