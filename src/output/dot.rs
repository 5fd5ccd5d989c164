use crate::errors::Result;
use crate::graph::{DependencyGraph, EntityKind};
use crate::output::{quoted, DiagramTarget, ExternalInvocation, RenderedOutput, Renderer};
use std::fmt::Write;

pub const MARKUP_EXTENSIONS: &[&str] = &["dot", "gv"];

/// Graphviz output, rendered through `dot` when an image is requested.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    pub target: DiagramTarget,
    pub keep_source: bool,
    pub tool: String,
}

impl Renderer for DotRenderer {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn render(&self, graph: &DependencyGraph) -> Result<RenderedOutput> {
        let markup = to_dot(graph);
        Ok(match &self.target {
            DiagramTarget::Stdout => RenderedOutput::Inline(markup),
            DiagramTarget::Markup(path) => RenderedOutput::File {
                path: path.clone(),
                contents: markup,
            },
            DiagramTarget::Image { path, format } => {
                RenderedOutput::External(ExternalInvocation {
                    program: self.tool.clone(),
                    args: vec![
                        format!("-T{format}"),
                        "-o".to_string(),
                        path.display().to_string(),
                    ],
                    input: markup,
                    output: path.clone(),
                    capture_stdout: false,
                    keep_source: self.keep_source.then(|| path.with_extension("dot")),
                })
            }
        })
    }
}

/// Build the dependency graph in Graphviz DOT format.
pub fn to_dot(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_dot(&mut out, graph);
    out
}

fn write_dot<W: Write>(writer: &mut W, graph: &DependencyGraph) -> std::fmt::Result {
    writeln!(writer, "digraph dependencies {{")?;
    writeln!(writer, "    rankdir=LR;")?;
    writeln!(
        writer,
        "    node [shape=box, style=filled, fillcolor=lightblue];"
    )?;
    writeln!(writer)?;

    for (name, kind) in graph.entities() {
        let style = match kind {
            EntityKind::Interface => ", shape=ellipse",
            EntityKind::Module => ", shape=folder",
            EntityKind::Function => ", fillcolor=palegreen",
            EntityKind::Unknown => ", fillcolor=lightgrey",
            EntityKind::Class => "",
        };
        writeln!(writer, "    {} [label={}{}];", quoted(name), quoted(name), style)?;
    }
    writeln!(writer)?;

    for (from, to, weight) in graph.edges() {
        if from == to {
            continue;
        }
        if weight > 1 {
            writeln!(
                writer,
                "    {} -> {} [label=\"{} refs\"];",
                quoted(from),
                quoted(to),
                weight
            )?;
        } else {
            writeln!(writer, "    {} -> {};", quoted(from), quoted(to))?;
        }
    }

    writeln!(writer, "}}")
}
