pub mod resolve;
pub mod schema;

use crate::filter::FilterSettings;
use crate::graph::WeightPolicy;
use std::path::PathBuf;

/// Crate roots treated as language built-ins unless `--internals` is given.
pub const RUST_BUILTINS: [&str; 3] = ["std", "core", "alloc"];

/// Fully resolved configuration, every layer applied.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub quiet: bool,

    // Targeting
    pub include: Vec<String>,
    pub exclude: Vec<String>,

    pub filters: FilterSettings,
    pub merge_weights: WeightPolicy,
    pub tools: ToolPaths,

    pub loaded_files: Vec<PathBuf>,
}

/// Executables used by renderers that delegate to external binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub dot: String,
    pub plantuml: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            dot: "dot".to_string(),
            plantuml: "plantuml".to_string(),
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            include: Vec::new(),
            exclude: Vec::new(),
            filters: FilterSettings {
                internal_prefixes: RUST_BUILTINS.iter().map(|p| p.to_string()).collect(),
                ..Default::default()
            },
            merge_weights: WeightPolicy::default(),
            tools: ToolPaths::default(),
            loaded_files: Vec::new(),
        }
    }
}
