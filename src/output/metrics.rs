use crate::errors::Result;
use crate::graph::DependencyGraph;
use crate::metrics::MetricsReport;
use crate::output::{RenderedOutput, Renderer};
use clap::ValueEnum;
use std::fmt::Write;

#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum MetricsFormat {
    #[default]
    Text,
    Json,
}

/// Coupling report. Works on the graph as it left the pre-filter stage so
/// `--no-classes` never changes the numbers.
#[derive(Debug, Clone, Default)]
pub struct MetricsRenderer {
    pub format: MetricsFormat,
}

impl Renderer for MetricsRenderer {
    fn name(&self) -> &'static str {
        "metrics"
    }

    fn applies_post_filters(&self) -> bool {
        false
    }

    fn render(&self, graph: &DependencyGraph) -> Result<RenderedOutput> {
        let report = MetricsReport::from_graph(graph);
        let out = match self.format {
            MetricsFormat::Json => {
                let mut json = serde_json::to_string_pretty(&report)?;
                json.push('\n');
                json
            }
            MetricsFormat::Text => to_text(&report),
        };
        Ok(RenderedOutput::Inline(out))
    }
}

fn to_text(report: &MetricsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Dependency Metrics");
    let _ = writeln!(out, "==================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Entities:     {}", report.entity_count);
    let _ = writeln!(out, "Dependencies: {}", report.edge_count);
    let _ = writeln!(
        out,
        "Kinds:        {} modules, {} classes, {} interfaces, {} functions",
        report.modules, report.classes, report.interfaces, report.functions
    );
    let _ = writeln!(out, "Abstractness: {:.2}", report.abstractness);
    let _ = writeln!(out);

    if !report.entities.is_empty() {
        let width = report
            .entities
            .iter()
            .map(|e| e.name.len())
            .max()
            .unwrap_or(0)
            .max("Entity".len());
        let _ = writeln!(
            out,
            "{:<width$} {:>4} {:>4} {:>11}",
            "Entity", "Ca", "Ce", "Instability"
        );
        let _ = writeln!(out, "{:-<1$}", "", width + 22);
        for entity in &report.entities {
            let _ = writeln!(
                out,
                "{:<width$} {:>4} {:>4} {:>11.2}",
                entity.name,
                entity.coupling.afferent,
                entity.coupling.efferent,
                entity.coupling.instability
            );
        }
        let _ = writeln!(out);
    }

    if !report.cycles.is_empty() {
        let _ = writeln!(out, "Cycles");
        let _ = writeln!(out, "------");
        for cycle in &report.cycles {
            let _ = writeln!(
                out,
                "Cycle #{} (size={}, internal_edges={})",
                cycle.id, cycle.size, cycle.internal_edges
            );
            for member in &cycle.members {
                let _ = writeln!(out, "  - {member}");
            }
        }
    }
    out
}
