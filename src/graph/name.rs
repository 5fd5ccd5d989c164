//! Helpers for namespace-segmented entity names.

/// Default namespace separator.
pub const DEFAULT_SEPARATOR: &str = "::";

/// Split a name into its non-empty namespace segments.
pub fn segments<'a>(name: &'a str, separator: &str) -> Vec<&'a str> {
    name.split(separator).filter(|s| !s.is_empty()).collect()
}

/// Keep at most `depth` leading segments.
pub fn truncate(name: &str, separator: &str, depth: usize) -> String {
    segments(name, separator)
        .into_iter()
        .take(depth)
        .collect::<Vec<_>>()
        .join(separator)
}

/// The enclosing namespace, or `None` for a top-level name.
pub fn namespace_of<'a>(name: &'a str, separator: &str) -> Option<&'a str> {
    name.rfind(separator)
        .map(|idx| &name[..idx])
        .filter(|ns| !ns.is_empty())
}

/// First segment of a name.
pub fn root_of<'a>(name: &'a str, separator: &str) -> &'a str {
    name.split(separator).next().unwrap_or(name)
}

/// True when `name` equals `namespace` or lives somewhere below it.
pub fn is_within(name: &str, namespace: &str, separator: &str) -> bool {
    let namespace = namespace.trim_end_matches(separator);
    if namespace.is_empty() {
        return true;
    }
    name == namespace
        || name
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with(separator))
}
