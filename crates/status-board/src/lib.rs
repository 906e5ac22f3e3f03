pub mod config;
pub mod error;
pub mod outages;
pub mod telemetry;
