use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use tracing::warn;

use super::graph::{DependencyGraph, ServiceId};
use super::window::OutageReport;

/// Map from each degraded service to the set of outed upstream services
/// responsible for it. Set-valued, so the contents are deterministic for
/// fixed inputs regardless of traversal order.
pub type ImpairmentMap = BTreeMap<ServiceId, BTreeSet<ServiceId>>;

/// Compute every service degraded by the given outage list at `now`.
///
/// Each outage whose window covers `now` seeds a breadth-first walk from its
/// service (the root fault) along dependent edges. Visited-tracking is kept
/// per root: a cycle terminates the walk for that root, while a node reached
/// from a second root still collects the second attribution. A root fault
/// counts as degraded by itself even when nothing depends on it.
///
/// Outages naming a service absent from the graph contribute nothing; the
/// condition is logged and resolution proceeds. `now` is an explicit
/// parameter so the computation stays a pure function of its inputs.
pub fn resolve(
    graph: &DependencyGraph,
    outages: &[OutageReport],
    now: DateTime<Utc>,
) -> ImpairmentMap {
    let mut impaired = ImpairmentMap::new();
    let mut walked: HashSet<&ServiceId> = HashSet::new();

    for report in outages {
        if !report.window.active_at(now) {
            continue;
        }

        let root = &report.service;
        if !graph.is_known(root) {
            warn!(service = %root, "outage names a service absent from the dependency graph, ignoring");
            continue;
        }
        // A second active window on the same root cannot add attributions.
        if !walked.insert(root) {
            continue;
        }

        let mut visited: HashSet<&ServiceId> = HashSet::new();
        let mut queue: VecDeque<&ServiceId> = VecDeque::new();
        visited.insert(root);
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            impaired
                .entry(current.clone())
                .or_default()
                .insert(root.clone());

            for dependent in graph.direct_dependents(current) {
                if visited.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }
    }

    impaired
}
