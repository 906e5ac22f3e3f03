//! Outage dependency tracking: which user-facing capabilities are degraded
//! when an upstream backend reports a maintenance window, and which upstream
//! is responsible.

pub mod graph;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod views;
pub mod window;

pub use graph::{ConfigurationError, DependencyGraph, ServiceId};
pub use repository::{OutageRepository, RepositoryError};
pub use resolver::{resolve, ImpairmentMap};
pub use router::status_router;
pub use service::{StatusService, StatusServiceError};
pub use views::{DegradedReport, ImpairmentRow, OutageWindowView};
pub use window::{OutageReport, OutageWindow};
