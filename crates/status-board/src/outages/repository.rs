use chrono::{DateTime, Utc};

use super::window::OutageReport;

/// Storage abstraction for the outage source so resolution can be exercised
/// without a persistence layer. Implementations own retrieval; the core only
/// consumes the returned records.
pub trait OutageRepository: Send + Sync {
    /// Every window still open at `instant`: scheduled, active, or ongoing.
    /// Windows that already closed are excluded.
    fn end_after(&self, instant: DateTime<Utc>) -> Result<Vec<OutageReport>, RepositoryError>;
}

/// Error enumeration for outage-store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("outage store unavailable: {0}")]
    Unavailable(String),
}
