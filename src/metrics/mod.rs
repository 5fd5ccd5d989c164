pub mod coupling;
pub mod scc;

use crate::graph::{DependencyGraph, EntityKind};
use coupling::Coupling;
use scc::Cycle;
use serde::Serialize;

/// Aggregate and per-entity metrics for a dependency graph.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub entity_count: usize,
    pub edge_count: usize,
    pub modules: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub functions: usize,
    /// `interfaces / (classes + interfaces)`
    pub abstractness: f64,
    pub entities: Vec<EntityMetrics>,
    pub cycles: Vec<Cycle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityMetrics {
    pub name: String,
    pub kind: EntityKind,
    #[serde(flatten)]
    pub coupling: Coupling,
}

impl MetricsReport {
    /// Per-entity rows cover entities owned by the analyzed code: known kind or
    /// at least one outgoing dependency.
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let count = |kind: EntityKind| graph.entities().filter(|(_, k)| *k == kind).count();
        let classes = count(EntityKind::Class);
        let interfaces = count(EntityKind::Interface);
        let abstractness = if classes + interfaces == 0 {
            0.0
        } else {
            ((interfaces as f64 / (classes + interfaces) as f64) * 100.0).round() / 100.0
        };

        let entities = graph
            .entities()
            .filter(|(name, kind)| *kind != EntityKind::Unknown || graph.has_dependencies(name))
            .map(|(name, kind)| EntityMetrics {
                name: name.to_string(),
                kind,
                coupling: coupling::coupling(graph, name),
            })
            .collect();

        Self {
            entity_count: graph.entity_count(),
            edge_count: graph.edge_count(),
            modules: count(EntityKind::Module),
            classes,
            interfaces,
            functions: count(EntityKind::Function),
            abstractness,
            entities,
            cycles: scc::find_cycles(graph),
        }
    }
}
