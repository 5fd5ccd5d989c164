use crate::graph::ir::{DependencyGraph, Entity};
use serde::Deserialize;

/// How weights of an edge present on both sides of a merge are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPolicy {
    /// Occurrences from both sources add up.
    #[default]
    Sum,
    /// The edge is counted once, with the larger of the two weights.
    Max,
}

impl WeightPolicy {
    pub fn combine(self, a: usize, b: usize) -> usize {
        match self {
            WeightPolicy::Sum => a.saturating_add(b),
            WeightPolicy::Max => a.max(b),
        }
    }
}

impl std::str::FromStr for WeightPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(WeightPolicy::Sum),
            "max" | "dedup" => Ok(WeightPolicy::Max),
            _ => Err(format!("unknown merge weight policy: {s}")),
        }
    }
}

impl DependencyGraph {
    /// Union of both graphs. Neither input is modified.
    pub fn merge(&self, other: &DependencyGraph, policy: WeightPolicy) -> DependencyGraph {
        let mut merged = self.clone();
        for (name, kind) in other.entities() {
            merged.declare(Entity::new(name, kind));
        }
        for (from, to, weight) in other.edges() {
            let from = Entity::new(from, other.kind(from).unwrap_or_default());
            let to = Entity::new(to, other.kind(to).unwrap_or_default());
            merged.insert_edge(from, to, weight, policy);
        }
        merged
    }
}
