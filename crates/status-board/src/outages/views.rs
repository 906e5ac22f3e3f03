use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::graph::ServiceId;
use super::resolver::ImpairmentMap;
use super::window::OutageReport;

/// One degraded capability paired with one upstream cause. A capability
/// impaired by several upstream outages yields one row per attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpairmentRow {
    pub external_service: ServiceId,
    pub internal_service: ServiceId,
}

/// Serialized shape of one outage window for API consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutageWindowView {
    pub service: ServiceId,
    pub start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl From<&OutageReport> for OutageWindowView {
    fn from(report: &OutageReport) -> Self {
        Self {
            service: report.service.clone(),
            start: report.window.start,
            end: report.window.end,
        }
    }
}

/// Assembled resolution output ready for serialization: the evaluation
/// instant, the attribution rows, and the windows that caused them.
#[derive(Debug, Clone, Serialize)]
pub struct DegradedReport {
    pub evaluated_at: DateTime<Utc>,
    pub affected_services: Vec<ImpairmentRow>,
    pub active_outages: Vec<OutageWindowView>,
}

impl DegradedReport {
    pub(crate) fn assemble(
        impaired: ImpairmentMap,
        outages: &[OutageReport],
        now: DateTime<Utc>,
    ) -> Self {
        let affected_services = impaired
            .iter()
            .flat_map(|(downstream, upstreams)| {
                upstreams.iter().map(|upstream| ImpairmentRow {
                    external_service: downstream.clone(),
                    internal_service: upstream.clone(),
                })
            })
            .collect();

        // Only windows that produced attributions are reported as causes;
        // a root fault always appears as a key of the impairment map.
        let active_outages = outages
            .iter()
            .filter(|report| {
                report.window.active_at(now) && impaired.contains_key(&report.service)
            })
            .map(OutageWindowView::from)
            .collect();

        Self {
            evaluated_at: now,
            affected_services,
            active_outages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.affected_services.is_empty()
    }
}
