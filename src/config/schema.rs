use serde::Deserialize;

/// TOML-deserializable config file. All fields are Option for layered merging.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub defaults: DefaultsFileConfig,
    #[serde(default)]
    pub filters: FiltersFileConfig,
    #[serde(default)]
    pub targeting: TargetingFileConfig,
    #[serde(default)]
    pub merge: MergeFileConfig,
    #[serde(default)]
    pub tools: ToolsFileConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultsFileConfig {
    pub quiet: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct FiltersFileConfig {
    pub internals: Option<bool>,
    pub internal_prefixes: Option<Vec<String>>,
    pub separator: Option<String>,
    pub depth: Option<usize>,
    pub exclude_regex: Option<String>,
    pub no_external: Option<bool>,
    pub no_classes: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TargetingFileConfig {
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MergeFileConfig {
    pub weights: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolsFileConfig {
    pub dot: Option<String>,
    pub plantuml: Option<String>,
}

impl FileConfig {
    /// Load from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
