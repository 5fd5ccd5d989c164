use crate::config::schema::FileConfig;
use crate::config::ResolvedConfig;
use crate::errors::{DeplensError, Result};
use crate::graph::WeightPolicy;
use std::path::{Path, PathBuf};

const PROJECT_CONFIG: &str = ".deplens.toml";

/// CLI overrides extracted from parsed command arguments.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub quiet: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub internals: bool,
    pub no_external: bool,
    pub filter_namespace: Option<String>,
    pub filter_from: Option<String>,
    pub depth: Option<usize>,
    pub exclude_regex: Option<String>,
    pub no_classes: bool,
}

/// Resolve configuration by applying layers bottom-up:
/// 1. Built-in defaults
/// 2. User config (~/.config/deplens/config.toml)
/// 3. Project config (nearest .deplens.toml walking up from working_dir)
/// 4. Environment variables
/// 5. CLI overrides
pub fn resolve_config(working_dir: &Path, cli: &CliOverrides) -> Result<ResolvedConfig> {
    let mut config = ResolvedConfig::default();

    if let Some(user_config_path) = find_user_config() {
        if user_config_path.exists() {
            let file_config = load_file(&user_config_path, "user")?;
            apply_file_config(&mut config, &file_config)?;
            config.loaded_files.push(user_config_path);
        }
    }

    if let Some(project_config_path) = find_project_config(working_dir) {
        let file_config = load_file(&project_config_path, "project")?;
        apply_file_config(&mut config, &file_config)?;
        config.loaded_files.push(project_config_path);
    }

    apply_env_vars(&mut config, |key| std::env::var(key).ok());
    apply_cli_overrides(&mut config, cli);

    tracing::debug!("loaded config files: {:?}", config.loaded_files);
    Ok(config)
}

fn load_file(path: &Path, layer: &str) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path).map_err(|_| {
        DeplensError::Config(format!("Could not read {layer} config: {}", path.display()))
    })?;
    FileConfig::from_toml(&content)
        .map_err(|e| DeplensError::Config(format!("Invalid {layer} config: {e}")))
}

fn find_user_config() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("deplens").join("config.toml"))
}

fn find_project_config(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(PROJECT_CONFIG);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

fn apply_file_config(config: &mut ResolvedConfig, file: &FileConfig) -> Result<()> {
    if let Some(quiet) = file.defaults.quiet {
        config.quiet = quiet;
    }

    let filters = &file.filters;
    if let Some(internals) = filters.internals {
        config.filters.internals = internals;
    }
    if let Some(ref prefixes) = filters.internal_prefixes {
        config.filters.internal_prefixes = prefixes.clone();
    }
    if let Some(ref separator) = filters.separator {
        if separator.is_empty() {
            return Err(DeplensError::Config(
                "filters.separator must not be empty".to_string(),
            ));
        }
        config.filters.separator = separator.clone();
    }
    if let Some(depth) = filters.depth {
        config.filters.depth = depth;
    }
    if let Some(ref pattern) = filters.exclude_regex {
        config.filters.exclude_regex = Some(pattern.clone());
    }
    if let Some(no_external) = filters.no_external {
        config.filters.no_external = no_external;
    }
    if let Some(no_classes) = filters.no_classes {
        config.filters.no_classes = no_classes;
    }

    if !file.targeting.include.is_empty() {
        config.include = file.targeting.include.clone();
    }
    if !file.targeting.exclude.is_empty() {
        config.exclude = file.targeting.exclude.clone();
    }

    if let Some(ref weights) = file.merge.weights {
        config.merge_weights = weights
            .parse::<WeightPolicy>()
            .map_err(DeplensError::Config)?;
    }

    if let Some(ref dot) = file.tools.dot {
        config.tools.dot = dot.clone();
    }
    if let Some(ref plantuml) = file.tools.plantuml {
        config.tools.plantuml = plantuml.clone();
    }
    Ok(())
}

fn is_truthy(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

/// Apply `DEPLENS_*` variables. Unparseable values are ignored.
fn apply_env_vars<F>(config: &mut ResolvedConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = var("DEPLENS_QUIET") {
        config.quiet = is_truthy(&val);
    }
    if let Some(val) = var("DEPLENS_INTERNALS") {
        config.filters.internals = is_truthy(&val);
    }
    if let Some(val) = var("DEPLENS_DEPTH") {
        if let Ok(depth) = val.parse::<usize>() {
            config.filters.depth = depth;
        }
    }
    if let Some(val) = var("DEPLENS_EXCLUDE_REGEX") {
        config.filters.exclude_regex = Some(val);
    }
    if let Some(val) = var("DEPLENS_MERGE_WEIGHTS") {
        if let Ok(policy) = val.parse::<WeightPolicy>() {
            config.merge_weights = policy;
        } else {
            tracing::warn!("ignoring DEPLENS_MERGE_WEIGHTS={val}");
        }
    }
    if let Some(val) = var("DEPLENS_DOT") {
        config.tools.dot = val;
    }
    if let Some(val) = var("DEPLENS_PLANTUML") {
        config.tools.plantuml = val;
    }
}

fn apply_cli_overrides(config: &mut ResolvedConfig, cli: &CliOverrides) {
    if cli.quiet {
        config.quiet = true;
    }
    if !cli.include.is_empty() {
        config.include = cli.include.clone();
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.clone();
    }
    if cli.internals {
        config.filters.internals = true;
    }
    if cli.no_external {
        config.filters.no_external = true;
    }
    if let Some(ref namespace) = cli.filter_namespace {
        config.filters.filter_namespace = Some(namespace.clone());
    }
    if let Some(ref namespace) = cli.filter_from {
        config.filters.filter_from = Some(namespace.clone());
    }
    if let Some(depth) = cli.depth {
        config.filters.depth = depth;
    }
    if let Some(ref pattern) = cli.exclude_regex {
        config.filters.exclude_regex = Some(pattern.clone());
    }
    if cli.no_classes {
        config.filters.no_classes = true;
    }
}
