use crate::analyze::StaticAnalyzer;
use crate::errors::AnalysisError;
use crate::graph::builder::GraphBuilder;
use crate::graph::name;
use crate::graph::{DependencyFact, DependencyGraph, Entity, EntityKind};
use std::path::{Component, Path, PathBuf};
use streaming_iterator::StreamingIterator;

const SEPARATOR: &str = "::";
const USE_QUERY: &str = r#"(use_declaration argument: (_) @arg)"#;

/// Facts extracted from a single file.
#[derive(Debug, Clone)]
pub struct FileFacts {
    pub module: Entity,
    pub facts: Vec<DependencyFact>,
    pub declared: Vec<Entity>,
}

/// Module-level static analyzer for Rust sources.
///
/// Each file becomes a module entity depending on every path it `use`s.
/// Top-level items are declared so metrics can count them.
pub struct RustAnalyzer {
    show_progress: bool,
}

impl RustAnalyzer {
    pub fn new() -> Self {
        Self {
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn language() -> tree_sitter::Language {
        tree_sitter_rust::LANGUAGE.into()
    }

    /// Module path for a file, relative to the nearest enclosing `src` directory.
    ///
    /// `src/lib.rs` and `src/main.rs` are `crate`, `src/a/mod.rs` is
    /// `crate::a`, `src/a/b.rs` is `crate::a::b`.
    pub fn module_name(path: &Path) -> String {
        let components: Vec<&str> = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();

        let below_src = match components.iter().rposition(|c| *c == "src") {
            Some(idx) => &components[idx + 1..],
            None => components.last().map(std::slice::from_ref).unwrap_or(&[]),
        };

        let mut segments = vec!["crate".to_string()];
        let count = below_src.len();
        for (i, segment) in below_src.iter().copied().enumerate() {
            let segment = if i + 1 == count {
                segment.strip_suffix(".rs").unwrap_or(segment)
            } else {
                segment
            };
            if i + 1 == count && matches!(segment, "mod" | "lib" | "main") {
                continue;
            }
            segments.push(segment.replace('-', "_"));
        }
        segments.join(SEPARATOR)
    }

    /// Extract facts from one file's source bytes.
    pub fn analyze_source(
        &self,
        source: &[u8],
        module: &str,
        file: &Path,
    ) -> Result<FileFacts, AnalysisError> {
        let language = Self::language();
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| syntax_error(file, 0, 0, format!("parser setup failed: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| syntax_error(file, 0, 0, "parser produced no tree".to_string()))?;
        let root = tree.root_node();

        if root.has_error() {
            let node = first_error(root).unwrap_or(root);
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let text = node.utf8_text(source).unwrap_or_default();
                let snippet: String = text.chars().take(40).collect();
                format!("unexpected `{}`", snippet.trim())
            };
            return Err(syntax_error(
                file,
                position.row + 1,
                position.column + 1,
                message,
            ));
        }

        let module_entity = Entity::new(module, EntityKind::Module);
        let mut facts = Vec::new();

        let query = tree_sitter::Query::new(&language, USE_QUERY)
            .map_err(|e| syntax_error(file, 0, 0, format!("invalid use query: {e}")))?;
        let mut cursor = tree_sitter::QueryCursor::new();
        let mut matches = cursor.matches(&query, root, source);
        while let Some(m) = matches.next() {
            for capture in m.captures {
                let mut paths = Vec::new();
                collect_use_paths(capture.node, source, "", &mut paths);
                for path in paths {
                    if let Some(target) = resolve_use_path(&path, module) {
                        facts.push(DependencyFact::new(
                            module_entity.clone(),
                            Entity::unknown(target),
                        ));
                    }
                }
            }
        }

        let mut declared = vec![module_entity.clone()];
        let mut walker = root.walk();
        for item in root.named_children(&mut walker) {
            let kind = match item.kind() {
                "struct_item" | "enum_item" | "union_item" => EntityKind::Class,
                "trait_item" => EntityKind::Interface,
                "function_item" => EntityKind::Function,
                _ => continue,
            };
            if let Some(item_name) = item
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(source).ok())
            {
                declared.push(Entity::new(format!("{module}{SEPARATOR}{item_name}"), kind));
            }
        }

        Ok(FileFacts {
            module: module_entity,
            facts,
            declared,
        })
    }
}

impl Default for RustAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticAnalyzer for RustAnalyzer {
    fn analyze(&self, files: &[PathBuf]) -> Result<DependencyGraph, AnalysisError> {
        let progress = if self.show_progress && files.len() > 1 {
            let pb = indicatif::ProgressBar::new(files.len() as u64);
            if let Ok(style) = indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let mut builder = GraphBuilder::new();
        let mut skipped = 0usize;

        for file in files {
            if let Some(ref pb) = progress {
                pb.inc(1);
            }
            let source = match std::fs::read(file) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.display(), e);
                    skipped += 1;
                    continue;
                }
            };

            let module = Self::module_name(file);
            let file_facts = match self.analyze_source(&source, &module, file) {
                Ok(f) => f,
                Err(e) => {
                    if let Some(pb) = progress {
                        pb.finish_and_clear();
                    }
                    return Err(e);
                }
            };
            for entity in file_facts.declared {
                builder.declare(entity);
            }
            builder.add_facts(file_facts.facts);
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let graph = builder.build();
        tracing::debug!(
            "static analysis: {} files ({} skipped), {} entities, {} edges",
            files.len(),
            skipped,
            graph.entity_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

fn syntax_error(file: &Path, line: usize, column: usize, message: String) -> AnalysisError {
    AnalysisError::Syntax {
        file: file.to_path_buf(),
        line,
        column,
        message,
    }
}

/// Depth-first search for the first `ERROR` or `MISSING` node.
fn first_error(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn join(prefix: &str, text: &str) -> String {
    if prefix.is_empty() {
        text.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{text}")
    }
}

/// Walk a `use` argument subtree and collect every full path it names.
fn collect_use_paths(node: tree_sitter::Node, source: &[u8], prefix: &str, paths: &mut Vec<String>) {
    match node.kind() {
        "scoped_use_list" => {
            let mut list_prefix = prefix.to_string();
            let mut list = None;
            let mut cursor = node.walk();
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "use_list" => list = Some(child),
                    "::" | "{" | "}" => {}
                    _ => {
                        let text = child.utf8_text(source).unwrap_or_default();
                        if !text.is_empty() {
                            list_prefix = join(prefix, text);
                        }
                    }
                }
            }
            if let Some(list) = list {
                collect_use_paths(list, source, &list_prefix, paths);
            }
        }
        "use_list" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                collect_use_paths(child, source, prefix, paths);
            }
        }
        "use_as_clause" => {
            if let Some(original) = node.child_by_field_name("path").or_else(|| node.child(0)) {
                collect_use_paths(original, source, prefix, paths);
            }
        }
        _ => {
            if node.is_named() {
                let text = node.utf8_text(source).unwrap_or_default();
                if !text.is_empty() {
                    paths.push(join(prefix, text));
                }
            }
        }
    }
}

/// Turn a collected `use` path into an absolute entity name.
///
/// Glob imports and `{self}` items name their parent module; `self::` and
/// `super::` are resolved against `module`.
fn resolve_use_path(path: &str, module: &str) -> Option<String> {
    let path: String = path.split_whitespace().collect();
    let mut path = path.as_str();
    path = path.strip_suffix("::*").unwrap_or(path);
    path = path.strip_suffix("::self").unwrap_or(path);
    if path.is_empty() || path == "*" {
        return None;
    }

    let mut base = module.to_string();
    let mut rest = path;
    let mut relative = false;
    loop {
        if let Some(tail) = rest.strip_prefix("super::").or_else(|| (rest == "super").then_some("")) {
            base = name::namespace_of(&base, SEPARATOR)?.to_string();
            rest = tail;
            relative = true;
        } else if let Some(tail) = rest.strip_prefix("self::").or_else(|| (rest == "self").then_some("")) {
            rest = tail;
            relative = true;
        } else {
            break;
        }
    }

    if !relative {
        return Some(rest.to_string());
    }
    if rest.is_empty() {
        Some(base)
    } else {
        Some(join(&base, rest))
    }
}
