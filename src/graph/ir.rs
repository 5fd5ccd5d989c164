use crate::graph::merge::WeightPolicy;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Discriminator attached to every entity.
///
/// The ordering is significant: when the same name is reported with two
/// different kinds the greater one is kept, so the outcome of a merge does not
/// depend on which side a kind came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Only ever seen as a dependency target
    #[default]
    Unknown,
    Module,
    Function,
    Class,
    Interface,
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unknown" => Ok(EntityKind::Unknown),
            "module" | "namespace" | "package" => Ok(EntityKind::Module),
            "function" | "fn" | "method" => Ok(EntityKind::Function),
            "class" | "struct" | "enum" => Ok(EntityKind::Class),
            "interface" | "trait" => Ok(EntityKind::Interface),
            _ => Err(format!("unknown entity kind: {s}")),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Unknown => write!(f, "unknown"),
            EntityKind::Module => write!(f, "module"),
            EntityKind::Function => write!(f, "function"),
            EntityKind::Class => write!(f, "class"),
            EntityKind::Interface => write!(f, "interface"),
        }
    }
}

/// A fully-qualified name plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn unknown(name: impl Into<String>) -> Self {
        Self::new(name, EntityKind::Unknown)
    }

    /// Empty or whitespace-only names cannot be placed in a graph.
    pub fn is_malformed(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// One observed "`from` uses `to`" relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyFact {
    pub from: Entity,
    pub to: Entity,
}

impl DependencyFact {
    pub fn new(from: Entity, to: Entity) -> Self {
        Self { from, to }
    }
}

/// Weighted dependency graph keyed by entity name.
///
/// Every edge endpoint is also present in the entity table. Ordered maps keep
/// iteration (and therefore every renderer) deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    entities: BTreeMap<String, EntityKind>,
    edges: BTreeMap<String, BTreeMap<String, usize>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Option<EntityKind> {
        self.entities.get(name).copied()
    }

    /// All entities in name order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, EntityKind)> {
        self.entities.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    /// All edges as `(from, to, weight)`, ordered by `from` then `to`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.edges.iter().flat_map(|(from, targets)| {
            targets
                .iter()
                .map(move |(to, weight)| (from.as_str(), to.as_str(), *weight))
        })
    }

    pub fn weight(&self, from: &str, to: &str) -> Option<usize> {
        self.edges.get(from).and_then(|targets| targets.get(to)).copied()
    }

    pub fn dependencies_of(&self, name: &str) -> impl Iterator<Item = (&str, usize)> {
        self.edges
            .get(name)
            .into_iter()
            .flat_map(|targets| targets.iter().map(|(to, w)| (to.as_str(), *w)))
    }

    pub fn dependants_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |(_, targets)| targets.contains_key(name))
            .map(|(from, _)| from.as_str())
    }

    pub fn has_dependencies(&self, name: &str) -> bool {
        self.edges.get(name).is_some_and(|targets| !targets.is_empty())
    }

    /// Register an entity without any edge. Returns false for malformed names.
    pub fn declare(&mut self, entity: Entity) -> bool {
        if entity.is_malformed() {
            return false;
        }
        self.upsert_entity(entity.name, entity.kind);
        true
    }

    fn upsert_entity(&mut self, name: String, kind: EntityKind) {
        self.entities
            .entry(name)
            .and_modify(|existing| *existing = (*existing).max(kind))
            .or_insert(kind);
    }

    /// Insert an edge, combining with an existing weight according to `policy`.
    pub(crate) fn insert_edge(
        &mut self,
        from: Entity,
        to: Entity,
        weight: usize,
        policy: WeightPolicy,
    ) {
        let to_name = to.name.clone();
        let from_name = from.name.clone();
        self.upsert_entity(from.name, from.kind);
        self.upsert_entity(to.name, to.kind);
        self.edges
            .entry(from_name)
            .or_default()
            .entry(to_name)
            .and_modify(|existing| *existing = policy.combine(*existing, weight))
            .or_insert(weight);
    }

    /// Keep only the entities accepted by `keep`, with the edges between them.
    pub fn retain_entities<F>(&self, keep: F) -> Self
    where
        F: Fn(&str, EntityKind) -> bool,
    {
        let entities: BTreeMap<String, EntityKind> = self
            .entities
            .iter()
            .filter(|(name, kind)| keep(name, **kind))
            .map(|(name, kind)| (name.clone(), *kind))
            .collect();

        let mut edges: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for (from, to, weight) in self.edges() {
            if entities.contains_key(from) && entities.contains_key(to) {
                edges
                    .entry(from.to_string())
                    .or_default()
                    .insert(to.to_string(), weight);
            }
        }

        Self { entities, edges }
    }

    /// Keep only the edges accepted by `keep`.
    ///
    /// Entities that lose their last incident edge are dropped; entities that
    /// never had one stay.
    pub fn retain_edges<F>(&self, keep: F) -> Self
    where
        F: Fn(&str, &str) -> bool,
    {
        let mut touched: BTreeSet<&str> = BTreeSet::new();
        let mut survivors: BTreeSet<&str> = BTreeSet::new();
        let mut edges: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();

        for (from, to, weight) in self.edges() {
            touched.insert(from);
            touched.insert(to);
            if keep(from, to) {
                survivors.insert(from);
                survivors.insert(to);
                edges
                    .entry(from.to_string())
                    .or_default()
                    .insert(to.to_string(), weight);
            }
        }

        let entities = self
            .entities
            .iter()
            .filter(|(name, _)| {
                survivors.contains(name.as_str()) || !touched.contains(name.as_str())
            })
            .map(|(name, kind)| (name.clone(), *kind))
            .collect();

        Self { entities, edges }
    }

    /// Rename every entity through `f`.
    ///
    /// `None` drops the entity and its edges. Entities mapped to the same name
    /// coincide: the greater kind wins and edge weights are summed.
    pub fn rename<F>(&self, f: F) -> Self
    where
        F: Fn(&str, EntityKind) -> Option<(String, EntityKind)>,
    {
        let mapping: HashMap<&str, Entity> = self
            .entities
            .iter()
            .filter_map(|(name, kind)| {
                f(name, *kind)
                    .map(|(new_name, new_kind)| Entity::new(new_name, new_kind))
                    .filter(|entity| !entity.is_malformed())
                    .map(|entity| (name.as_str(), entity))
            })
            .collect();

        let mut graph = Self::new();
        for entity in mapping.values() {
            graph.upsert_entity(entity.name.clone(), entity.kind);
        }
        for (from, to, weight) in self.edges() {
            if let (Some(from), Some(to)) = (mapping.get(from), mapping.get(to)) {
                graph.insert_edge(from.clone(), to.clone(), weight, WeightPolicy::Sum);
            }
        }
        graph
    }

    /// Convert into a petgraph graph (node weight = name, edge weight = weight).
    pub fn to_petgraph(&self) -> (DiGraph<String, usize>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for name in self.entities.keys() {
            let idx = graph.add_node(name.clone());
            index.insert(name.clone(), idx);
        }
        for (from, to, weight) in self.edges() {
            graph.add_edge(index[from], index[to], weight);
        }
        (graph, index)
    }
}
