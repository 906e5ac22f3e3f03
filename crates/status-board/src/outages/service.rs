use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::graph::DependencyGraph;
use super::repository::{OutageRepository, RepositoryError};
use super::resolver;
use super::views::DegradedReport;
use super::window::OutageReport;

/// Service facade composing the immutable dependency graph with the outage
/// source. The graph is built once and shared; every call is a pure function
/// of the repository snapshot and the supplied evaluation instant.
pub struct StatusService<R> {
    graph: Arc<DependencyGraph>,
    outages: Arc<R>,
}

impl<R> StatusService<R>
where
    R: OutageRepository + 'static,
{
    pub fn new(graph: DependencyGraph, outages: Arc<R>) -> Self {
        Self {
            graph: Arc::new(graph),
            outages,
        }
    }

    /// The dependency graph shared by every resolution call.
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Windows still open at `now`, exactly as the outage source reports
    /// them: currently active plus scheduled-but-not-yet-started.
    pub fn open_windows(&self, now: DateTime<Utc>) -> Result<Vec<OutageReport>, StatusServiceError> {
        Ok(self.outages.end_after(now)?)
    }

    /// Resolve which capabilities are degraded at `now` and which upstream
    /// outages are responsible.
    pub fn degraded(&self, now: DateTime<Utc>) -> Result<DegradedReport, StatusServiceError> {
        let outages = self.outages.end_after(now)?;
        let impaired = resolver::resolve(&self.graph, &outages, now);
        Ok(DegradedReport::assemble(impaired, &outages, now))
    }
}

/// Error raised by the status service. The resolver itself cannot fail; the
/// only failure mode is the outage source, and it is surfaced untouched.
#[derive(Debug, thiserror::Error)]
pub enum StatusServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
