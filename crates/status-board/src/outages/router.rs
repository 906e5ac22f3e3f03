use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::repository::OutageRepository;
use super::service::{StatusService, StatusServiceError};
use super::views::OutageWindowView;

/// Router builder exposing the degraded-status and maintenance-window
/// endpoints.
pub fn status_router<R>(service: Arc<StatusService<R>>) -> Router
where
    R: OutageRepository + 'static,
{
    Router::new()
        .route("/api/v1/backend_statuses", get(backend_statuses_handler::<R>))
        .route(
            "/api/v1/maintenance_windows",
            get(maintenance_windows_handler::<R>),
        )
        .route("/api/v1/dependencies", get(dependencies_handler::<R>))
        .with_state(service)
}

/// Optional RFC 3339 instant overriding "now" for the evaluation; defaults
/// to the wall clock, captured once at the request boundary.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EvaluationQuery {
    pub(crate) at: Option<DateTime<Utc>>,
}

impl EvaluationQuery {
    fn instant(&self) -> DateTime<Utc> {
        self.at.unwrap_or_else(Utc::now)
    }
}

pub(crate) async fn backend_statuses_handler<R>(
    State(service): State<Arc<StatusService<R>>>,
    Query(query): Query<EvaluationQuery>,
) -> Response
where
    R: OutageRepository + 'static,
{
    match service.degraded(query.instant()) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(StatusServiceError::Repository(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn maintenance_windows_handler<R>(
    State(service): State<Arc<StatusService<R>>>,
    Query(query): Query<EvaluationQuery>,
) -> Response
where
    R: OutageRepository + 'static,
{
    match service.open_windows(query.instant()) {
        Ok(windows) => {
            let views: Vec<OutageWindowView> =
                windows.iter().map(OutageWindowView::from).collect();
            let payload = json!({ "maintenance_windows": views });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(StatusServiceError::Repository(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn dependencies_handler<R>(
    State(service): State<Arc<StatusService<R>>>,
) -> Response
where
    R: OutageRepository + 'static,
{
    let graph = service.graph();
    let edges: Vec<serde_json::Value> = graph
        .edges()
        .map(|(upstream, downstream)| {
            json!({ "upstream": upstream, "downstream": downstream })
        })
        .collect();

    let payload = json!({
        "services": graph.services().collect::<Vec<_>>(),
        "edges": edges,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
