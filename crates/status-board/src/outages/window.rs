use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::graph::ServiceId;

/// Maintenance or outage interval attached to one upstream service.
///
/// The interval is half-open, `[start, end)`. A missing `end` means the
/// outage is ongoing with no announced resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageWindow {
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl OutageWindow {
    pub fn ongoing(start: DateTime<Utc>) -> Self {
        Self { start, end: None }
    }

    pub fn bounded(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Whether the window covers `now`. The upper bound is exclusive, so a
    /// window ending exactly at `now` is no longer active.
    pub fn active_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && self.end.map_or(true, |end| end > now)
    }

    /// Whether the window is still open at `instant`: not yet ended, or
    /// ongoing. Stores use this to drop windows that closed in the past.
    pub fn ends_after(&self, instant: DateTime<Utc>) -> bool {
        self.end.map_or(true, |end| end > instant)
    }
}

/// One outage record as supplied by the outage source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageReport {
    pub service: ServiceId,
    pub window: OutageWindow,
}

impl OutageReport {
    pub fn new(service: impl Into<ServiceId>, window: OutageWindow) -> Self {
        Self {
            service: service.into(),
            window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn window_starting_now_is_active() {
        let window = OutageWindow::ongoing(instant(6));
        assert!(window.active_at(instant(6)));
    }

    #[test]
    fn window_ending_now_is_not_active() {
        let window = OutageWindow::bounded(instant(4), instant(6));
        assert!(window.active_at(instant(5)));
        assert!(!window.active_at(instant(6)));
    }

    #[test]
    fn window_without_end_stays_active() {
        let window = OutageWindow::ongoing(instant(1));
        assert!(window.active_at(instant(23)));
    }

    #[test]
    fn future_window_is_open_but_not_active() {
        let window = OutageWindow::bounded(instant(10), instant(12));
        assert!(!window.active_at(instant(8)));
        assert!(window.ends_after(instant(8)));
    }

    #[test]
    fn closed_window_no_longer_ends_after() {
        let window = OutageWindow::bounded(instant(1), instant(3));
        assert!(!window.ends_after(instant(3)));
        assert!(!window.ends_after(instant(5)));
    }
}
