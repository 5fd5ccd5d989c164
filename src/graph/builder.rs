use crate::graph::ir::{DependencyFact, DependencyGraph, Entity};
use crate::graph::merge::WeightPolicy;

/// Accumulates facts into a `DependencyGraph`, counting repeated edges.
pub struct GraphBuilder {
    graph: DependencyGraph,
    dropped: usize,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: DependencyGraph::new(),
            dropped: 0,
        }
    }

    /// Add one fact. Facts with a blank endpoint are dropped.
    pub fn add_fact(&mut self, fact: DependencyFact) {
        self.add_weighted(fact, 1);
    }

    /// Add a fact observed `count` times. A zero count declares both
    /// endpoints without an edge.
    pub fn add_weighted(&mut self, fact: DependencyFact, count: usize) {
        if fact.from.is_malformed() || fact.to.is_malformed() {
            tracing::trace!("dropping malformed fact {:?} -> {:?}", fact.from, fact.to);
            self.dropped += 1;
            return;
        }
        if count == 0 {
            self.graph.declare(fact.from);
            self.graph.declare(fact.to);
            return;
        }
        self.graph
            .insert_edge(fact.from, fact.to, count, WeightPolicy::Sum);
    }

    pub fn add_facts<I>(&mut self, facts: I)
    where
        I: IntoIterator<Item = DependencyFact>,
    {
        for fact in facts {
            self.add_fact(fact);
        }
    }

    /// Register an entity that may have no edges (a declared item).
    pub fn declare(&mut self, entity: Entity) {
        if !self.graph.declare(entity) {
            self.dropped += 1;
        }
    }

    /// Number of facts and declarations discarded so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn build(self) -> DependencyGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Group facts by source entity. Malformed facts are dropped silently.
    pub fn build<I>(facts: I) -> Self
    where
        I: IntoIterator<Item = DependencyFact>,
    {
        let mut builder = GraphBuilder::new();
        builder.add_facts(facts);
        builder.build()
    }
}
