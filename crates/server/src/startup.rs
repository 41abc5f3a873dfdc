use std::sync::Arc;
use std::time::Duration;

use common::admin_http::spawn_admin_server;
use common::env::ensure_env;
use common::metrics::encode_metrics;
use common::utils::log_sink::{FanOutLogSink, FileLogSink, LogSink, TracingLogSink};
use configs::AppConfig;
use models::db::{ProcedureExecutor, SeaOrmRoutineDriver};
use service::countries::{CountriesSource, HttpCountrySource};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive().max_age(Duration::from_secs(3600))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown must come from the process manager");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received, draining connections");
}

/// Wire every dependency from `cfg` and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    ensure_env(&cfg.logging.path).await?;
    let log: Arc<dyn LogSink> = Arc::new(FanOutLogSink::new(vec![
        Arc::new(TracingLogSink),
        Arc::new(FileLogSink::new(&cfg.logging.path)),
    ]));

    let driver = SeaOrmRoutineDriver::connect(&cfg.database).await?;
    let executor = Arc::new(ProcedureExecutor::from_config(Arc::new(driver), log.clone(), &cfg.database));
    let countries: Arc<dyn CountriesSource> = Arc::new(HttpCountrySource::from_config(&cfg.rest_countries)?);
    let state = AppState::from_config(&cfg, executor, countries, log)?;

    if let Some(admin_addr) = cfg.server.admin_addr.as_deref() {
        spawn_admin_server(admin_addr, encode_metrics);
    }

    let app = routes::build_router(state, build_cors());
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!(%addr, docs = "/docs", "catalog api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server stopped");
    Ok(())
}
