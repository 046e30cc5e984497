use anyhow::{Context, Result};
use tracing::{info, warn};

use lastmile_admin_api::config::StorageBackend;
use lastmile_admin_api::{app, config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;

    middleware::logging::init_logging(&config.logging)?;
    middleware::init_metrics().context("failed to install Prometheus recorder")?;

    info!("Starting Last-Mile Admin API v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.socket_addr()?;
    let app = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

            info!("Running database migrations...");
            persistence::db::run_migrations(&pool).await?;
            info!("Migrations completed");

            app::create_app(config, pool)
        }
        StorageBackend::InMemory => {
            warn!("Using the in-memory backend; data is lost on restart");
            if config.database.seed_operator_email.is_empty() {
                warn!("No seed operator configured; login will fail");
            }
            let stores = app::in_memory_stores(&config.database)?;
            app::create_app_with_stores(config, stores, None)
        }
    }
    .context("invalid session signing configuration")?;

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received");
}
