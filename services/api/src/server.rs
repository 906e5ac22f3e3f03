use crate::cli::ServeArgs;
use crate::infra::{
    default_dependency_edges, sample_outage_windows, AppState, InMemoryOutageRepository,
};
use crate::routes::with_status_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use status_board::config::AppConfig;
use status_board::error::AppError;
use status_board::outages::{DependencyGraph, StatusService};
use status_board::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    // A malformed edge list refuses startup; running with a bad graph would
    // report wrong degradations for every request.
    let graph = DependencyGraph::from_edges(default_dependency_edges())?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryOutageRepository::default());
    if args.demo_windows {
        repository.extend(sample_outage_windows(Utc::now()));
    }

    let service = Arc::new(StatusService::new(graph, repository));

    let app = with_status_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "backend status board ready");

    axum::serve(listener, app).await?;
    Ok(())
}
