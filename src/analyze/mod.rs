pub mod rust;
pub mod trace;

use crate::errors::AnalysisError;
use crate::graph::DependencyGraph;
use std::path::{Path, PathBuf};

/// Derives dependency facts from source files without executing them.
pub trait StaticAnalyzer {
    /// Analyze a batch of files. A file that cannot be parsed fails the batch
    /// with `AnalysisError::Syntax`.
    fn analyze(&self, files: &[PathBuf]) -> Result<DependencyGraph, AnalysisError>;
}

/// Derives dependency facts from a recorded execution trace.
pub trait DynamicTraceAnalyzer {
    fn analyze(&self, trace_file: &Path) -> Result<DependencyGraph, AnalysisError>;
}
