use crate::analyze::DynamicTraceAnalyzer;
use crate::errors::AnalysisError;
use crate::graph::builder::GraphBuilder;
use crate::graph::{DependencyFact, DependencyGraph, Entity, EntityKind};
use serde::Deserialize;
use std::path::Path;

/// One recorded call (or use) between two entities.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceCall {
    pub caller: String,
    pub callee: String,
    #[serde(default)]
    pub caller_kind: Option<String>,
    #[serde(default)]
    pub callee_kind: Option<String>,
    /// How many times the call was observed.
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TraceDocument {
    Wrapped { calls: Vec<TraceCall> },
    Bare(Vec<TraceCall>),
}

impl TraceDocument {
    fn into_calls(self) -> Vec<TraceCall> {
        match self {
            TraceDocument::Wrapped { calls } => calls,
            TraceDocument::Bare(calls) => calls,
        }
    }
}

/// Reads JSON call traces: `{"calls": [{"caller": .., "callee": ..}]}` or a
/// bare array of the same objects.
pub struct JsonTraceAnalyzer;

impl JsonTraceAnalyzer {
    pub fn parse(content: &str, path: &Path) -> Result<DependencyGraph, AnalysisError> {
        let document: TraceDocument =
            serde_json::from_str(content).map_err(|e| AnalysisError::Trace {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut builder = GraphBuilder::new();
        for call in document.into_calls() {
            let from = Entity::new(call.caller, parse_kind(call.caller_kind.as_deref()));
            let to = Entity::new(call.callee, parse_kind(call.callee_kind.as_deref()));
            builder.add_weighted(DependencyFact::new(from, to), call.count);
        }
        if builder.dropped() > 0 {
            tracing::debug!(
                "dropped {} malformed trace entries from {}",
                builder.dropped(),
                path.display()
            );
        }
        Ok(builder.build())
    }
}

fn parse_kind(kind: Option<&str>) -> EntityKind {
    kind.and_then(|k| k.parse().ok()).unwrap_or_default()
}

impl DynamicTraceAnalyzer for JsonTraceAnalyzer {
    fn analyze(&self, trace_file: &Path) -> Result<DependencyGraph, AnalysisError> {
        let content = std::fs::read_to_string(trace_file).map_err(|source| AnalysisError::Io {
            path: trace_file.to_path_buf(),
            source,
        })?;
        Self::parse(&content, trace_file)
    }
}
