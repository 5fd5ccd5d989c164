use crate::graph::DependencyGraph;
use petgraph::algo::tarjan_scc;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::HashSet;

/// A dependency cycle: a strongly connected component with more than one
/// member, or a single entity that depends on itself.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Cycle {
    pub id: usize,
    pub size: usize,
    pub members: Vec<String>,
    pub internal_edges: usize,
}

/// Find all dependency cycles, members sorted, cycles ordered by first member.
pub fn find_cycles(graph: &DependencyGraph) -> Vec<Cycle> {
    let (pg, _) = graph.to_petgraph();
    let mut cycles = Vec::new();

    for scc in tarjan_scc(&pg) {
        let is_self_loop = scc.len() == 1 && {
            let node = scc[0];
            pg.edges_directed(node, petgraph::Direction::Outgoing)
                .any(|e| e.target() == node)
        };
        if scc.len() <= 1 && !is_self_loop {
            continue;
        }

        let scc_set: HashSet<_> = scc.iter().copied().collect();
        let internal_edges = scc
            .iter()
            .flat_map(|&node| pg.edges_directed(node, petgraph::Direction::Outgoing))
            .filter(|edge| scc_set.contains(&edge.target()))
            .count();

        let mut members: Vec<String> = scc.iter().map(|&idx| pg[idx].clone()).collect();
        members.sort();

        cycles.push(Cycle {
            id: 0,
            size: scc.len(),
            members,
            internal_edges,
        });
    }

    cycles.sort_by(|a, b| a.members.cmp(&b.members));
    for (id, cycle) in cycles.iter_mut().enumerate() {
        cycle.id = id;
    }
    cycles
}
