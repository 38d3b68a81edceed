mod api;
mod cache;
mod middleware;
mod scheduler;

use std::sync::Arc;

use hypewatch_sentiment::AnalysisOptions;
use hypewatch_store::JsonStore;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::ReportCache,
    middleware::{AuthState, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(hypewatch_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let brands = hypewatch_core::load_brands(&config.brands_path)?;
    tracing::info!(
        env = %config.env,
        brands = brands.brands.len(),
        data_dir = %config.data_dir.display(),
        store_dir = %config.store_dir.display(),
        "starting hypewatch server"
    );

    let store = JsonStore::open(&config.store_dir).await?;
    let reports = ReportCache::new(
        config.data_dir.clone(),
        brands.brands,
        AnalysisOptions {
            top_hashtags: config.top_hashtags,
            ..AnalysisOptions::default()
        },
    );
    if let Err(e) = reports.refresh().await {
        tracing::warn!(error = %e, "initial analysis failed; serving the no-data report");
    }

    let _scheduler = scheduler::build_scheduler(reports.clone(), &config.refresh_cron).await?;

    let auth = AuthState::from_env(config.is_development())?;
    let rate_limit = RateLimitState::per_minute(config.rate_limit_per_minute);
    let app = build_app(
        AppState {
            config: Arc::clone(&config),
            reports,
            store,
        },
        auth,
        rate_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
