use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, case-sensitive identifier for one backend service or user-facing
/// capability. Nodes come into existence by appearing in the configured edge
/// list; the identifier itself carries no structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ServiceId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for ServiceId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Immutable directed graph of service dependencies.
///
/// Built once at startup from the deployed edge list and shared read-only by
/// every resolution call afterwards. An edge `(upstream, downstream)` means
/// the downstream service cannot function correctly while the upstream one is
/// impaired. Both adjacency directions are indexed at construction so lookups
/// never walk the full edge set.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    dependents: BTreeMap<ServiceId, BTreeSet<ServiceId>>,
    ancestors: BTreeMap<ServiceId, BTreeSet<ServiceId>>,
    services: BTreeSet<ServiceId>,
}

impl DependencyGraph {
    /// Build the graph from `(upstream, downstream)` pairs.
    ///
    /// Duplicate pairs are idempotent. Cycles are accepted; the resolver is
    /// responsible for terminating on them. A self-edge or a blank identifier
    /// is a deployment mistake and fails construction outright.
    pub fn from_edges<I, S>(edges: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<ServiceId>,
    {
        let mut graph = Self::default();

        for (upstream, downstream) in edges {
            let upstream = upstream.into();
            let downstream = downstream.into();

            if upstream.as_str().trim().is_empty() || downstream.as_str().trim().is_empty() {
                return Err(ConfigurationError::BlankIdentifier);
            }
            if upstream == downstream {
                return Err(ConfigurationError::SelfDependency { service: upstream });
            }

            graph.services.insert(upstream.clone());
            graph.services.insert(downstream.clone());
            graph
                .dependents
                .entry(upstream.clone())
                .or_default()
                .insert(downstream.clone());
            graph.ancestors.entry(downstream).or_default().insert(upstream);
        }

        Ok(graph)
    }

    /// Services one edge downstream of `service`; empty when nothing depends
    /// on it or the identifier is unknown.
    pub fn direct_dependents<'a>(
        &'a self,
        service: &ServiceId,
    ) -> impl Iterator<Item = &'a ServiceId> + 'a {
        self.dependents.get(service).into_iter().flatten()
    }

    /// Services one edge upstream of `service`.
    pub fn direct_ancestors<'a>(
        &'a self,
        service: &ServiceId,
    ) -> impl Iterator<Item = &'a ServiceId> + 'a {
        self.ancestors.get(service).into_iter().flatten()
    }

    /// Whether the identifier appeared anywhere in the configured edge list.
    pub fn is_known(&self, service: &ServiceId) -> bool {
        self.services.contains(service)
    }

    /// Every service named by the edge list, in identifier order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceId> {
        self.services.iter()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// The full edge set as `(upstream, downstream)` pairs, in index order.
    pub fn edges(&self) -> impl Iterator<Item = (&ServiceId, &ServiceId)> {
        self.dependents
            .iter()
            .flat_map(|(upstream, downstreams)| {
                downstreams.iter().map(move |downstream| (upstream, downstream))
            })
    }

    pub fn edge_count(&self) -> usize {
        self.dependents.values().map(BTreeSet::len).sum()
    }
}

/// Raised when the deployed edge list is malformed; fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("service '{service}' cannot depend on itself")]
    SelfDependency { service: ServiceId },
    #[error("dependency edge names a blank service identifier")]
    BlankIdentifier,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> DependencyGraph {
        DependencyGraph::from_edges([
            ("bgs", "lighthouse"),
            ("mpi", "lighthouse"),
            ("lighthouse", "claims"),
        ])
        .expect("valid edges")
    }

    #[test]
    fn nodes_are_created_implicitly_from_edges() {
        let graph = graph();
        assert_eq!(graph.service_count(), 4);
        assert!(graph.is_known(&ServiceId::from("bgs")));
        assert!(graph.is_known(&ServiceId::from("claims")));
        assert!(!graph.is_known(&ServiceId::from("vet360")));
    }

    #[test]
    fn direct_dependents_reflect_declared_edges() {
        let graph = graph();
        let dependents: Vec<&ServiceId> =
            graph.direct_dependents(&ServiceId::from("lighthouse")).collect();
        assert_eq!(dependents, vec![&ServiceId::from("claims")]);

        let leaf: Vec<&ServiceId> = graph.direct_dependents(&ServiceId::from("claims")).collect();
        assert!(leaf.is_empty());
    }

    #[test]
    fn direct_ancestors_index_mirrors_edges() {
        let graph = graph();
        let ancestors: Vec<&ServiceId> =
            graph.direct_ancestors(&ServiceId::from("lighthouse")).collect();
        assert_eq!(ancestors, vec![&ServiceId::from("bgs"), &ServiceId::from("mpi")]);
    }

    #[test]
    fn duplicate_edges_are_idempotent() {
        let graph = DependencyGraph::from_edges([
            ("bgs", "lighthouse"),
            ("bgs", "lighthouse"),
            ("bgs", "lighthouse"),
        ])
        .expect("valid edges");

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.service_count(), 2);
    }

    #[test]
    fn self_edge_is_rejected() {
        let error =
            DependencyGraph::from_edges([("bgs", "bgs")]).expect_err("self-edge must fail");
        assert_eq!(
            error,
            ConfigurationError::SelfDependency {
                service: ServiceId::from("bgs")
            }
        );
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let error =
            DependencyGraph::from_edges([("bgs", "  ")]).expect_err("blank id must fail");
        assert_eq!(error, ConfigurationError::BlankIdentifier);
    }

    #[test]
    fn cycles_are_accepted_at_construction() {
        let graph = DependencyGraph::from_edges([("evss", "lighthouse"), ("lighthouse", "evss")])
            .expect("cycles are a resolution concern, not a construction one");
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn edges_iterates_the_full_set() {
        let graph = graph();
        let edges: Vec<(String, String)> = graph
            .edges()
            .map(|(up, down)| (up.as_str().to_string(), down.as_str().to_string()))
            .collect();
        assert_eq!(
            edges,
            vec![
                ("bgs".to_string(), "lighthouse".to_string()),
                ("lighthouse".to_string(), "claims".to_string()),
                ("mpi".to_string(), "lighthouse".to_string()),
            ]
        );
    }
}
