use crate::errors::Result;
use crate::graph::DependencyGraph;
use crate::output::{RenderedOutput, Renderer};
use std::fmt::Write;

/// One `A --> B` line per dependency.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    pub weights: bool,
}

impl Renderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, graph: &DependencyGraph) -> Result<RenderedOutput> {
        let mut out = String::new();
        for (from, to, weight) in graph.edges() {
            if from == to {
                continue;
            }
            if self.weights {
                let _ = writeln!(out, "{from} --> {to} ({weight})");
            } else {
                let _ = writeln!(out, "{from} --> {to}");
            }
        }
        Ok(RenderedOutput::Inline(out))
    }
}
