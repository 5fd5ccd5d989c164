use crate::graph::name;
use crate::graph::{DependencyGraph, EntityKind};
use regex::Regex;

/// When a rule runs relative to command construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Applied to the graph before it is handed to the command.
    Pre,
    /// Applied by the command right before rendering.
    Post,
}

/// Closed set of filter rules.
///
/// Variants are listed in application order; `FilterPipeline` relies on it.
#[derive(Debug, Clone)]
pub enum FilterRule {
    /// Drop entities whose root segment is a language built-in.
    ExcludeInternals {
        prefixes: Vec<String>,
        separator: String,
    },
    /// Drop entities the analyzed code does not own.
    ExcludeExternal,
    /// Keep only entities inside a namespace.
    FilterNamespace {
        namespace: String,
        separator: String,
    },
    /// Keep only edges that leave a namespace.
    FilterFrom {
        namespace: String,
        separator: String,
    },
    /// Collapse names to their first `depth` segments.
    CollapseDepth { depth: usize, separator: String },
    /// Drop entities whose name matches the pattern.
    ExcludePattern(Regex),
    /// Replace every entity by its enclosing namespace.
    CollapseToNamespace { separator: String },
}

impl FilterRule {
    pub fn stage(&self) -> Stage {
        match self {
            FilterRule::CollapseToNamespace { .. } => Stage::Post,
            FilterRule::ExcludeInternals { .. }
            | FilterRule::ExcludeExternal
            | FilterRule::FilterNamespace { .. }
            | FilterRule::FilterFrom { .. }
            | FilterRule::CollapseDepth { .. }
            | FilterRule::ExcludePattern(_) => Stage::Pre,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            FilterRule::ExcludeInternals { .. } => "exclude-internals",
            FilterRule::ExcludeExternal => "exclude-external",
            FilterRule::FilterNamespace { .. } => "filter-namespace",
            FilterRule::FilterFrom { .. } => "filter-from",
            FilterRule::CollapseDepth { .. } => "depth",
            FilterRule::ExcludePattern(_) => "exclude-regex",
            FilterRule::CollapseToNamespace { .. } => "no-classes",
        }
    }

    pub fn apply(&self, graph: &DependencyGraph) -> DependencyGraph {
        match self {
            FilterRule::ExcludeInternals {
                prefixes,
                separator,
            } => graph.retain_entities(|entity, _| {
                let root = name::root_of(entity, separator);
                !prefixes.iter().any(|p| p == root)
            }),
            FilterRule::ExcludeExternal => graph.retain_entities(|entity, kind| {
                kind != EntityKind::Unknown || graph.has_dependencies(entity)
            }),
            FilterRule::FilterNamespace {
                namespace,
                separator,
            } => graph.retain_entities(|entity, _| name::is_within(entity, namespace, separator)),
            FilterRule::FilterFrom {
                namespace,
                separator,
            } => graph.retain_edges(|from, _| name::is_within(from, namespace, separator)),
            FilterRule::CollapseDepth { depth, separator } => graph.rename(|entity, kind| {
                let collapsed = name::truncate(entity, separator, *depth);
                let kind = if collapsed == entity {
                    kind
                } else {
                    EntityKind::Module
                };
                Some((collapsed, kind))
            }),
            FilterRule::ExcludePattern(pattern) => {
                graph.retain_entities(|entity, _| !pattern.is_match(entity))
            }
            FilterRule::CollapseToNamespace { separator } => graph.rename(|entity, _| {
                name::namespace_of(entity, separator)
                    .map(|ns| (ns.to_string(), EntityKind::Module))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyFact, Entity};
    use pretty_assertions::assert_eq;

    fn build(edges: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph::build(
            edges
                .iter()
                .map(|(f, t)| DependencyFact::new(Entity::unknown(*f), Entity::unknown(*t))),
        )
    }

    fn sep() -> String {
        "::".to_string()
    }

    #[test]
    fn exclude_pattern_removes_matching_endpoints_only() {
        let graph = build(&[("A", "B"), ("A", "C"), ("X", "B")]);
        let rule = FilterRule::ExcludePattern(Regex::new("C").unwrap());
        let filtered = rule.apply(&graph);
        let edges: Vec<_> = filtered.edges().collect();
        assert_eq!(edges, vec![("A", "B", 1), ("X", "B", 1)]);
    }

    #[test]
    fn internals_are_removed_by_root_segment() {
        let graph = build(&[
            ("crate::a", "std::collections::HashMap"),
            ("crate::a", "crate::b"),
            ("crate::a", "stdx::Thing"),
        ]);
        let rule = FilterRule::ExcludeInternals {
            prefixes: vec!["std".into(), "core".into()],
            separator: sep(),
        };
        let filtered = rule.apply(&graph);
        assert!(!filtered.contains("std::collections::HashMap"));
        assert!(filtered.contains("stdx::Thing"));
        assert_eq!(filtered.edge_count(), 2);
    }

    #[test]
    fn external_entities_are_removed() {
        let mut graph = build(&[("crate::a", "serde::Serialize"), ("crate::a", "crate::b::B")]);
        graph.declare(Entity::new("crate::b::B", EntityKind::Class));
        let filtered = FilterRule::ExcludeExternal.apply(&graph);
        assert!(!filtered.contains("serde::Serialize"));
        assert_eq!(filtered.weight("crate::a", "crate::b::B"), Some(1));
    }

    #[test]
    fn filter_namespace_keeps_edges_inside() {
        let graph = build(&[("app::a", "app::b"), ("app::a", "lib::c"), ("lib::c", "lib::d")]);
        let rule = FilterRule::FilterNamespace {
            namespace: "app".into(),
            separator: sep(),
        };
        let filtered = rule.apply(&graph);
        let edges: Vec<_> = filtered.edges().collect();
        assert_eq!(edges, vec![("app::a", "app::b", 1)]);
    }

    #[test]
    fn filter_from_keeps_outgoing_edges() {
        let graph = build(&[("app::a", "lib::c"), ("lib::c", "lib::d")]);
        let rule = FilterRule::FilterFrom {
            namespace: "app".into(),
            separator: sep(),
        };
        let filtered = rule.apply(&graph);
        let edges: Vec<_> = filtered.edges().collect();
        assert_eq!(edges, vec![("app::a", "lib::c", 1)]);
        assert!(!filtered.contains("lib::d"));
    }

    #[test]
    fn depth_collapse_merges_weights() {
        let graph = build(&[("a::x::One", "b::y::Two"), ("a::z::Three", "b::w::Four")]);
        let rule = FilterRule::CollapseDepth {
            depth: 1,
            separator: sep(),
        };
        let collapsed = rule.apply(&graph);
        assert_eq!(collapsed.weight("a", "b"), Some(2));
        assert_eq!(collapsed.kind("a"), Some(EntityKind::Module));
    }

    #[test]
    fn collapse_to_namespace_drops_top_level_names() {
        let graph = build(&[("app::model::User", "app::db::Pool"), ("main", "app::model::User")]);
        let rule = FilterRule::CollapseToNamespace { separator: sep() };
        let collapsed = rule.apply(&graph);
        assert!(!collapsed.contains("main"));
        assert_eq!(collapsed.weight("app::model", "app::db"), Some(1));
    }

    #[test]
    fn only_namespace_collapse_is_post() {
        assert_eq!(
            FilterRule::CollapseToNamespace { separator: sep() }.stage(),
            Stage::Post
        );
        assert_eq!(FilterRule::ExcludeExternal.stage(), Stage::Pre);
    }
}
