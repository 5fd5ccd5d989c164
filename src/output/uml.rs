use crate::errors::Result;
use crate::graph::{DependencyGraph, EntityKind};
use crate::output::{quoted, DiagramTarget, ExternalInvocation, RenderedOutput, Renderer};
use std::collections::HashMap;
use std::fmt::Write;

pub const MARKUP_EXTENSIONS: &[&str] = &["uml", "puml", "plantuml"];

/// PlantUML class diagram, rendered through `plantuml -pipe` for images.
#[derive(Debug, Clone)]
pub struct UmlRenderer {
    pub target: DiagramTarget,
    pub keep_source: bool,
    pub tool: String,
}

impl Renderer for UmlRenderer {
    fn name(&self) -> &'static str {
        "uml"
    }

    fn render(&self, graph: &DependencyGraph) -> Result<RenderedOutput> {
        let markup = to_plantuml(graph);
        Ok(match &self.target {
            DiagramTarget::Stdout => RenderedOutput::Inline(markup),
            DiagramTarget::Markup(path) => RenderedOutput::File {
                path: path.clone(),
                contents: markup,
            },
            DiagramTarget::Image { path, format } => {
                RenderedOutput::External(ExternalInvocation {
                    program: self.tool.clone(),
                    args: vec!["-pipe".to_string(), format!("-t{format}")],
                    input: markup,
                    output: path.clone(),
                    capture_stdout: true,
                    keep_source: self.keep_source.then(|| path.with_extension("puml")),
                })
            }
        })
    }
}

/// Names are aliased so that nested namespaces never clash with a class of the
/// same name.
pub fn to_plantuml(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    let aliases: HashMap<&str, String> = graph
        .entities()
        .enumerate()
        .map(|(i, (name, _))| (name, format!("e{i}")))
        .collect();

    out.push_str("@startuml\n");
    out.push_str("set namespaceSeparator none\n");
    out.push_str("hide empty members\n\n");

    for (name, kind) in graph.entities() {
        let (keyword, stereotype) = match kind {
            EntityKind::Interface => ("interface", ""),
            EntityKind::Class => ("class", ""),
            EntityKind::Module => ("class", " << (M,#AAD7FF) module >>"),
            EntityKind::Function => ("class", " << (F,#B5E7A0) function >>"),
            EntityKind::Unknown => ("class", " << (E,#DDDDDD) >>"),
        };
        let _ = writeln!(out, "{keyword} {} as {}{stereotype}", quoted(name), aliases[name]);
    }
    out.push('\n');

    for (from, to, _) in graph.edges() {
        if from == to {
            continue;
        }
        let _ = writeln!(out, "{} --> {}", aliases[from], aliases[to]);
    }

    out.push_str("@enduml\n");
    out
}
