//! Pre- and post-filter stages built from resolved filter settings.
//!
//! Both stages draw from the same `FilterRule` vocabulary; each rule's
//! `stage()` decides where it runs. Rules are appended in one fixed order so
//! that depth collapsing always happens before pattern exclusion sees the
//! collapsed names.

pub mod rules;

pub use rules::{FilterRule, Stage};

use crate::errors::Result;
use crate::graph::DependencyGraph;
use regex::Regex;

/// Filter-relevant options after configuration layering.
///
/// The default value enables no rule at all. The built-in prefixes dropped
/// without `--internals` come from the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSettings {
    /// Keep language built-ins in the graph.
    pub internals: bool,
    /// Built-in roots dropped unless `internals` is set.
    pub internal_prefixes: Vec<String>,
    pub no_external: bool,
    pub filter_namespace: Option<String>,
    pub filter_from: Option<String>,
    /// `0` disables collapsing.
    pub depth: usize,
    pub exclude_regex: Option<String>,
    pub no_classes: bool,
    pub separator: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            internals: false,
            internal_prefixes: Vec::new(),
            no_external: false,
            filter_namespace: None,
            filter_from: None,
            depth: 0,
            exclude_regex: None,
            no_classes: false,
            separator: crate::graph::name::DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// An ordered, immutable list of rules applied left to right.
#[derive(Debug, Clone, Default)]
pub struct Transform {
    rules: Vec<FilterRule>,
}

impl Transform {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn is_identity(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    pub fn apply(&self, graph: &DependencyGraph) -> DependencyGraph {
        self.rules.iter().fold(graph.clone(), |current, rule| {
            let next = rule.apply(&current);
            tracing::debug!(
                "filter {}: {} -> {} entities, {} -> {} edges",
                rule.name(),
                current.entity_count(),
                next.entity_count(),
                current.edge_count(),
                next.edge_count()
            );
            next
        })
    }
}

/// Both filter stages, built once from the same settings.
#[derive(Debug, Clone)]
pub struct FilterPipeline {
    pre: Transform,
    post: Transform,
}

impl FilterPipeline {
    pub fn from_settings(settings: &FilterSettings) -> Result<Self> {
        let (pre, post): (Vec<_>, Vec<_>) = declared_rules(settings)?
            .into_iter()
            .partition(|rule| rule.stage() == Stage::Pre);
        Ok(Self {
            pre: Transform { rules: pre },
            post: Transform { rules: post },
        })
    }

    pub fn pre(&self) -> &Transform {
        &self.pre
    }

    pub fn post(&self) -> &Transform {
        &self.post
    }

    pub fn into_stages(self) -> (Transform, Transform) {
        (self.pre, self.post)
    }
}

/// Transform for the pre-filter stage.
pub fn pre_filters(settings: &FilterSettings) -> Result<Transform> {
    Ok(FilterPipeline::from_settings(settings)?.pre)
}

/// Transform for the post-filter stage.
pub fn post_filters(settings: &FilterSettings) -> Result<Transform> {
    Ok(FilterPipeline::from_settings(settings)?.post)
}

/// Every rule enabled by `settings`, in application order.
fn declared_rules(settings: &FilterSettings) -> Result<Vec<FilterRule>> {
    let separator = settings.separator.clone();
    let mut rules = Vec::new();

    if !settings.internals && !settings.internal_prefixes.is_empty() {
        rules.push(FilterRule::ExcludeInternals {
            prefixes: settings.internal_prefixes.clone(),
            separator: separator.clone(),
        });
    }
    if settings.no_external {
        rules.push(FilterRule::ExcludeExternal);
    }
    if let Some(namespace) = non_empty(&settings.filter_namespace) {
        rules.push(FilterRule::FilterNamespace {
            namespace: namespace.to_string(),
            separator: separator.clone(),
        });
    }
    if let Some(namespace) = non_empty(&settings.filter_from) {
        rules.push(FilterRule::FilterFrom {
            namespace: namespace.to_string(),
            separator: separator.clone(),
        });
    }
    if settings.depth > 0 {
        rules.push(FilterRule::CollapseDepth {
            depth: settings.depth,
            separator: separator.clone(),
        });
    }
    if let Some(pattern) = non_empty(&settings.exclude_regex) {
        rules.push(FilterRule::ExcludePattern(Regex::new(pattern)?));
    }
    if settings.no_classes {
        rules.push(FilterRule::CollapseToNamespace { separator });
    }

    Ok(rules)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{DependencyFact, Entity, WeightPolicy};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn build(edges: &[(&str, &str)]) -> DependencyGraph {
        DependencyGraph::build(
            edges
                .iter()
                .map(|(f, t)| DependencyFact::new(Entity::unknown(*f), Entity::unknown(*t))),
        )
    }

    fn keep_everything() -> FilterSettings {
        FilterSettings::default()
    }

    fn rust_builtins() -> FilterSettings {
        FilterSettings {
            internal_prefixes: vec!["std".into(), "core".into(), "alloc".into()],
            ..Default::default()
        }
    }

    #[test]
    fn no_options_is_identity() {
        let graph = build(&[("crate::a", "std::fmt"), ("crate::a", "crate::b"), ("std::x", "A")]);
        let pre = pre_filters(&FilterSettings::default()).unwrap();
        let post = post_filters(&FilterSettings::default()).unwrap();
        assert!(pre.is_identity());
        assert!(post.is_identity());
        assert_eq!(pre.apply(&graph), graph);
        assert_eq!(post.apply(&graph), graph);
    }

    #[test]
    fn configured_prefixes_exclude_internals() {
        let pre = pre_filters(&rust_builtins()).unwrap();
        assert_eq!(pre.rules().len(), 1);
        assert_eq!(pre.rules()[0].name(), "exclude-internals");

        let graph = build(&[("crate::a", "std::fmt"), ("crate::a", "crate::b")]);
        let filtered = pre.apply(&graph);
        let edges: Vec<_> = filtered.edges().collect();
        assert_eq!(edges, vec![("crate::a", "crate::b", 1)]);
    }

    #[test]
    fn internals_flag_keeps_configured_prefixes() {
        let settings = FilterSettings {
            internals: true,
            ..rust_builtins()
        };
        assert!(pre_filters(&settings).unwrap().is_identity());
    }

    #[test]
    fn depth_runs_before_pattern() {
        // After collapsing to depth 1 the only names left are "a" and "b";
        // a pattern anchored on the collapsed name must see them.
        let graph = build(&[("a::x", "b::y"), ("a::z", "c::w")]);
        let settings = FilterSettings {
            depth: 1,
            exclude_regex: Some("^c$".into()),
            ..keep_everything()
        };
        let filtered = pre_filters(&settings).unwrap().apply(&graph);
        let edges: Vec<_> = filtered.edges().collect();
        assert_eq!(edges, vec![("a", "b", 1)]);
    }

    #[test]
    fn rules_are_partitioned_by_stage() {
        let settings = FilterSettings {
            depth: 2,
            no_classes: true,
            exclude_regex: Some("Test".into()),
            ..keep_everything()
        };
        let pipeline = FilterPipeline::from_settings(&settings).unwrap();
        let pre: Vec<_> = pipeline.pre().rules().iter().map(FilterRule::name).collect();
        let post: Vec<_> = pipeline.post().rules().iter().map(FilterRule::name).collect();
        assert_eq!(pre, vec!["depth", "exclude-regex"]);
        assert_eq!(post, vec!["no-classes"]);
    }

    #[test]
    fn blank_string_options_contribute_nothing() {
        let settings = FilterSettings {
            filter_namespace: Some("  ".into()),
            exclude_regex: Some(String::new()),
            ..keep_everything()
        };
        assert!(pre_filters(&settings).unwrap().is_identity());
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let settings = FilterSettings {
            exclude_regex: Some("(".into()),
            ..keep_everything()
        };
        assert!(pre_filters(&settings).is_err());
    }

    #[test]
    fn same_settings_same_transform() {
        let graph = build(&[("a::b::C", "a::d::E"), ("a::b::C", "x::Y")]);
        let settings = FilterSettings {
            depth: 2,
            filter_namespace: Some("a".into()),
            ..keep_everything()
        };
        let first = pre_filters(&settings).unwrap().apply(&graph);
        let second = pre_filters(&settings).unwrap().apply(&graph);
        assert_eq!(first, second);
    }

    fn arb_graph() -> impl Strategy<Value = DependencyGraph> {
        let name = prop::sample::select(vec!["A", "B", "C", "Core", "x::C", "x::D"]);
        prop::collection::vec((name.clone(), name), 0..20).prop_map(|edges| {
            DependencyGraph::build(edges.into_iter().map(|(f, t)| {
                DependencyFact::new(Entity::unknown(f), Entity::unknown(t))
            }))
        })
    }

    proptest! {
        #[test]
        fn empty_options_never_change_a_graph(g in arb_graph()) {
            let settings = FilterSettings::default();
            prop_assert_eq!(pre_filters(&settings).unwrap().apply(&g), g.clone());
            prop_assert_eq!(post_filters(&settings).unwrap().apply(&g), g);
        }

        #[test]
        fn pattern_exclusion_commutes_with_merge(g1 in arb_graph(), g2 in arb_graph()) {
            let settings = FilterSettings {
                exclude_regex: Some("C".into()),
                ..keep_everything()
            };
            let pre = pre_filters(&settings).unwrap();
            let merged_then_filtered = pre.apply(&g1.merge(&g2, WeightPolicy::Sum));
            let filtered_then_merged = pre.apply(&g1).merge(&pre.apply(&g2), WeightPolicy::Sum);
            prop_assert_eq!(merged_then_filtered, filtered_then_merged);
        }
    }
}
