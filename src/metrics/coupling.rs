use crate::graph::DependencyGraph;
use serde::Serialize;

/// Coupling figures for one entity. Self-dependencies are not counted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Coupling {
    /// Distinct entities depending on this one (fan-in).
    pub afferent: usize,
    /// Distinct entities this one depends on (fan-out).
    pub efferent: usize,
    /// `efferent / (afferent + efferent)`, 0 when isolated.
    pub instability: f64,
}

/// Compute fan-out for an entity.
pub fn efferent(graph: &DependencyGraph, name: &str) -> usize {
    graph
        .dependencies_of(name)
        .filter(|(to, _)| *to != name)
        .count()
}

/// Compute fan-in for an entity.
pub fn afferent(graph: &DependencyGraph, name: &str) -> usize {
    graph.dependants_of(name).filter(|from| *from != name).count()
}

pub fn coupling(graph: &DependencyGraph, name: &str) -> Coupling {
    let afferent = afferent(graph, name);
    let efferent = efferent(graph, name);
    let total = afferent + efferent;
    let instability = if total == 0 {
        0.0
    } else {
        ((efferent as f64 / total as f64) * 100.0).round() / 100.0
    };
    Coupling {
        afferent,
        efferent,
        instability,
    }
}
