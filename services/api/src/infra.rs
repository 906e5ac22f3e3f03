use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use status_board::outages::{
    OutageReport, OutageRepository, OutageWindow, RepositoryError, ServiceId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-backed outage store standing behind the repository seam. Production
/// deployments would query a persistence layer; this one is fed by seeding
/// (demo mode) and keeps resolution exercisable end to end.
#[derive(Default, Clone)]
pub(crate) struct InMemoryOutageRepository {
    windows: Arc<Mutex<Vec<OutageReport>>>,
}

impl InMemoryOutageRepository {
    pub(crate) fn seeded(reports: impl IntoIterator<Item = OutageReport>) -> Self {
        let repository = Self::default();
        repository.extend(reports);
        repository
    }

    pub(crate) fn extend(&self, reports: impl IntoIterator<Item = OutageReport>) {
        let mut guard = self.windows.lock().expect("outage mutex poisoned");
        guard.extend(reports);
    }
}

impl OutageRepository for InMemoryOutageRepository {
    fn end_after(&self, instant: DateTime<Utc>) -> Result<Vec<OutageReport>, RepositoryError> {
        let guard = self.windows.lock().expect("outage mutex poisoned");
        Ok(guard
            .iter()
            .filter(|report| report.window.ends_after(instant))
            .cloned()
            .collect())
    }
}

/// The deployed dependency topology. Upstream backends on the left,
/// the services and user-facing capabilities they impair on the right.
/// Changing this list is a redeploy, not a runtime operation.
pub(crate) fn default_dependency_edges() -> Vec<(&'static str, &'static str)> {
    vec![
        ("vbms", "evss"),
        ("evss", "lighthouse"),
        ("bgs", "lighthouse"),
        ("mpi", "lighthouse"),
        ("lighthouse", "claims"),
        ("bgs", "caseflow"),
        ("caseflow", "appeals"),
        ("bgs", "letters"),
        ("bgs", "payment_history"),
        ("bgs", "direct_deposit"),
        ("mpi", "vet360"),
        ("vet360", "profile"),
        ("mpi", "profile"),
        ("vista", "health_records"),
        ("mpi", "health_records"),
    ]
}

/// Sample windows used by demo mode and the CLI report when no outages are
/// supplied: one ongoing backend outage, one bounded maintenance window, and
/// one record naming a service the graph does not know.
pub(crate) fn sample_outage_windows(now: DateTime<Utc>) -> Vec<OutageReport> {
    vec![
        OutageReport::new("bgs", OutageWindow::ongoing(now - chrono::Duration::hours(2))),
        OutageReport::new(
            "vista",
            OutageWindow::bounded(
                now - chrono::Duration::minutes(30),
                now + chrono::Duration::hours(1),
            ),
        ),
        OutageReport::new("dslogon", OutageWindow::ongoing(now - chrono::Duration::hours(1))),
    ]
}

pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 instant ({err})"))
}

/// Parse an outage argument of the form `service=start[,end]` with RFC 3339
/// timestamps, e.g. `bgs=2026-08-01T00:00:00Z` or
/// `vista=2026-08-01T00:00:00Z,2026-08-01T04:00:00Z`.
pub(crate) fn parse_outage(raw: &str) -> Result<OutageReport, String> {
    let (service, window) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected 'service=start[,end]', got '{raw}'"))?;

    let service = service.trim();
    if service.is_empty() {
        return Err(format!("missing service identifier in '{raw}'"));
    }

    let window = match window.split_once(',') {
        Some((start, end)) => OutageWindow::bounded(parse_instant(start)?, parse_instant(end)?),
        None => OutageWindow::ongoing(parse_instant(window)?),
    };

    Ok(OutageReport {
        service: ServiceId::from(service),
        window,
    })
}
