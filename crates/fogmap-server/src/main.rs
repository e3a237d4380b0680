mod api;
mod middleware;

use std::sync::Arc;

use fogmap_grid::{default_enumerator, QuestOptions};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = fogmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = fogmap_db::PoolConfig::from_app_config(&config);
    let pool = fogmap_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = fogmap_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let catalog = fogmap_core::load_points_of_interest(&config.poi_path)?;
    tracing::info!(
        points = catalog.points.len(),
        path = %config.poi_path.display(),
        "loaded points of interest"
    );

    // Build the full-region cache before accepting traffic.
    let total_cells = tokio::task::spawn_blocking(|| default_enumerator().total_cells()).await?;
    tracing::info!(total_cells, "grid ready");

    let auth = AuthState::from_env(matches!(config.env, fogmap_core::Environment::Development))?;
    let state = AppState {
        pool,
        pois: Arc::from(catalog.points),
        quest_options: QuestOptions {
            radius_km: config.quest_radius_km,
            limit: config.quest_limit,
        },
        fog_max_cells: config.fog_max_cells,
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "fogmap-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
