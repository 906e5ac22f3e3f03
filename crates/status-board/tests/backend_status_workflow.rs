//! Integration specifications for outage resolution and the status API.
//!
//! Scenarios run through the public service facade and HTTP router so the
//! graph, resolver, and presentation shapes are validated together without
//! reaching into private modules.

mod common {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use status_board::outages::{
        DependencyGraph, OutageReport, OutageRepository, OutageWindow, RepositoryError,
        StatusService,
    };

    pub(super) fn instant(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    /// Topology shared by the scenarios: a diamond into lighthouse, a chain
    /// through to claims, and an independent vet360 branch.
    pub(super) fn graph() -> DependencyGraph {
        DependencyGraph::from_edges([
            ("vbms", "evss"),
            ("evss", "lighthouse"),
            ("bgs", "lighthouse"),
            ("mpi", "lighthouse"),
            ("lighthouse", "claims"),
            ("mpi", "vet360"),
            ("vet360", "profile"),
        ])
        .expect("valid edges")
    }

    /// Outage-source double: vec-backed, with a switch to simulate the
    /// backing store going away.
    #[derive(Default)]
    pub(super) struct Repository {
        windows: Mutex<Vec<OutageReport>>,
        unavailable: AtomicBool,
    }

    impl Repository {
        pub(super) fn with_windows(windows: Vec<OutageReport>) -> Self {
            Self {
                windows: Mutex::new(windows),
                unavailable: AtomicBool::new(false),
            }
        }

        pub(super) fn go_offline(&self) {
            self.unavailable.store(true, Ordering::Relaxed);
        }
    }

    impl OutageRepository for Repository {
        fn end_after(&self, instant: DateTime<Utc>) -> Result<Vec<OutageReport>, RepositoryError> {
            if self.unavailable.load(Ordering::Relaxed) {
                return Err(RepositoryError::Unavailable(
                    "status datastore offline".to_string(),
                ));
            }

            let guard = self.windows.lock().expect("window mutex poisoned");
            Ok(guard
                .iter()
                .filter(|report| report.window.ends_after(instant))
                .cloned()
                .collect())
        }
    }

    pub(super) fn ongoing(service: &str, start_hour: u32) -> OutageReport {
        OutageReport::new(service, OutageWindow::ongoing(instant(start_hour)))
    }

    pub(super) fn bounded(service: &str, start_hour: u32, end_hour: u32) -> OutageReport {
        OutageReport::new(
            service,
            OutageWindow::bounded(instant(start_hour), instant(end_hour)),
        )
    }

    pub(super) fn build_service(
        windows: Vec<OutageReport>,
    ) -> (StatusService<Repository>, Arc<Repository>) {
        let repository = Arc::new(Repository::with_windows(windows));
        (StatusService::new(graph(), repository.clone()), repository)
    }
}

mod resolution {
    use super::common::*;
    use status_board::outages::{ImpairmentRow, ServiceId, StatusServiceError};

    #[test]
    fn degraded_report_attributes_transitive_impact() {
        let (service, _repository) = build_service(vec![ongoing("bgs", 1)]);

        let report = service.degraded(instant(2)).expect("store reachable");

        let expected = |external: &str| ImpairmentRow {
            external_service: ServiceId::from(external),
            internal_service: ServiceId::from("bgs"),
        };
        assert_eq!(
            report.affected_services,
            vec![expected("bgs"), expected("claims"), expected("lighthouse")]
        );
        assert_eq!(report.active_outages.len(), 1);
        assert_eq!(report.evaluated_at, instant(2));
    }

    #[test]
    fn diamond_outage_produces_one_row_per_attribution() {
        let (service, _repository) =
            build_service(vec![ongoing("bgs", 1), ongoing("mpi", 1)]);

        let report = service.degraded(instant(2)).expect("store reachable");

        let lighthouse_causes: Vec<&str> = report
            .affected_services
            .iter()
            .filter(|row| row.external_service == ServiceId::from("lighthouse"))
            .map(|row| row.internal_service.as_str())
            .collect();
        assert_eq!(lighthouse_causes, vec!["bgs", "mpi"]);

        // The vet360 branch only degrades from the mpi root.
        let profile_causes: Vec<&str> = report
            .affected_services
            .iter()
            .filter(|row| row.external_service == ServiceId::from("profile"))
            .map(|row| row.internal_service.as_str())
            .collect();
        assert_eq!(profile_causes, vec!["mpi"]);
    }

    #[test]
    fn expired_and_scheduled_windows_do_not_degrade() {
        let (service, _repository) =
            build_service(vec![bounded("bgs", 1, 3), ongoing("mpi", 20)]);

        let report = service.degraded(instant(5)).expect("store reachable");
        assert!(report.is_empty());

        // The scheduled mpi window is still announced by the source.
        let open = service.open_windows(instant(5)).expect("store reachable");
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].service, ServiceId::from("mpi"));
    }

    #[test]
    fn store_failure_surfaces_as_repository_error() {
        let (service, repository) = build_service(vec![ongoing("bgs", 1)]);
        repository.go_offline();

        let error = service.degraded(instant(2)).expect_err("store is offline");
        assert!(matches!(error, StatusServiceError::Repository(_)));
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use status_board::outages::status_router;
    use std::sync::Arc;

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn backend_statuses_returns_attribution_rows() {
        let (service, _repository) = build_service(vec![ongoing("bgs", 1)]);
        let router = status_router(Arc::new(service));

        let response = get(router, "/api/v1/backend_statuses?at=2026-08-01T02:00:00Z").await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload = body_json(response).await;
        assert_eq!(
            payload
                .get("evaluated_at")
                .and_then(Value::as_str)
                .map(|raw| raw.starts_with("2026-08-01T02:00:00")),
            Some(true)
        );

        let rows = payload
            .get("affected_services")
            .and_then(Value::as_array)
            .expect("affected_services array");
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| {
            row.get("internal_service").and_then(Value::as_str) == Some("bgs")
        }));
    }

    #[tokio::test]
    async fn backend_statuses_is_empty_without_active_outages() {
        let (service, _repository) = build_service(Vec::new());
        let router = status_router(Arc::new(service));

        let response = get(router, "/api/v1/backend_statuses?at=2026-08-01T02:00:00Z").await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload = body_json(response).await;
        assert_eq!(
            payload
                .get("affected_services")
                .and_then(Value::as_array)
                .map(Vec::len),
            Some(0)
        );
    }

    #[tokio::test]
    async fn maintenance_windows_lists_open_windows() {
        let (service, _repository) =
            build_service(vec![bounded("vbms", 1, 6), bounded("bgs", 1, 2)]);
        let router = status_router(Arc::new(service));

        let response = get(router, "/api/v1/maintenance_windows?at=2026-08-01T03:00:00Z").await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload = body_json(response).await;
        let windows = payload
            .get("maintenance_windows")
            .and_then(Value::as_array)
            .expect("maintenance_windows array");
        assert_eq!(windows.len(), 1);
        assert_eq!(
            windows[0].get("service").and_then(Value::as_str),
            Some("vbms")
        );
    }

    #[tokio::test]
    async fn store_failure_maps_to_service_unavailable() {
        let (service, repository) = build_service(vec![ongoing("bgs", 1)]);
        repository.go_offline();
        let router = status_router(Arc::new(service));

        let response = get(router, "/api/v1/backend_statuses?at=2026-08-01T02:00:00Z").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let payload = body_json(response).await;
        assert!(payload
            .get("error")
            .and_then(Value::as_str)
            .expect("error message")
            .contains("unavailable"));
    }

    #[tokio::test]
    async fn dependencies_endpoint_describes_the_graph() {
        let (service, _repository) = build_service(Vec::new());
        let router = status_router(Arc::new(service));

        let response = get(router, "/api/v1/dependencies").await;
        assert_eq!(response.status(), StatusCode::OK);

        let payload = body_json(response).await;
        let services = payload
            .get("services")
            .and_then(Value::as_array)
            .expect("services array");
        assert!(services.iter().any(|value| value == "lighthouse"));
    }

    /// Dispatch a GET through the router so each scenario reads as one
    /// request.
    async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
        use tower::ServiceExt;

        router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch")
    }
}
