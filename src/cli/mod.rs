pub mod dispatch;
pub mod help;
pub mod resolve;
pub mod schema;

use crate::config::resolve::{resolve_config, CliOverrides};
use crate::errors::Result;
use crate::output::dsm::DsmFormat;
use crate::output::metrics::MetricsFormat;
use clap::Args;
use dispatch::{Command, Dispatcher, Outcome};
use resolve::{RawInvocation, Route};
use std::io::Write;
use std::path::PathBuf;

pub const BIN_NAME: &str = "deplens";

/// Commands that need a dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Uml,
    Dot,
    Dsm,
    Text,
    Metrics,
}

impl CommandKind {
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Uml,
        CommandKind::Dot,
        CommandKind::Dsm,
        CommandKind::Text,
        CommandKind::Metrics,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Uml => "uml",
            CommandKind::Dot => "dot",
            CommandKind::Dsm => "dsm",
            CommandKind::Text => "text",
            CommandKind::Metrics => "metrics",
        }
    }

    pub fn about(self) -> &'static str {
        match self {
            CommandKind::Uml => "Generate a PlantUML class diagram",
            CommandKind::Dot => "Generate a Graphviz dependency graph",
            CommandKind::Dsm => "Generate a dependency structure matrix",
            CommandKind::Text => "Print every dependency as `A --> B`",
            CommandKind::Metrics => "Report coupling metrics and dependency cycles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Commands that never run an analysis, with their descriptions.
pub const DIAGNOSTIC_COMMANDS: &[(&str, &str)] = &[
    ("help", "Display help for a command"),
    ("list", "List available commands"),
    (
        "self-test",
        "Check that the source analyzer understands every supported construct",
    ),
];

/// Every command name, analysis commands first.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    CommandKind::ALL
        .into_iter()
        .map(CommandKind::name)
        .chain(DIAGNOSTIC_COMMANDS.iter().map(|(name, _)| *name))
}

#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct InputArgs {
    /// Source files, directories or glob patterns to analyze
    #[arg(required = true, num_args = 1.., value_name = "SOURCE")]
    pub source: Vec<PathBuf>,

    /// Include glob patterns
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude glob patterns
    #[arg(long)]
    pub exclude: Vec<String>,

    /// JSON call trace whose dependencies are merged into the static graph
    #[arg(long, value_name = "TRACE")]
    pub dynamic: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct FilterArgs {
    /// Keep dependencies on the standard library
    #[arg(long)]
    pub internals: bool,

    /// Drop entities that only appear as dependency targets
    #[arg(long)]
    pub no_external: bool,

    /// Only keep dependencies between entities inside this namespace
    #[arg(long, value_name = "NAMESPACE")]
    pub filter_namespace: Option<String>,

    /// Only keep dependencies that originate inside this namespace
    #[arg(long, value_name = "NAMESPACE")]
    pub filter_from: Option<String>,

    /// Collapse names to their first N namespace segments
    #[arg(long, short)]
    pub depth: Option<usize>,

    /// Drop entities whose name matches this regular expression
    #[arg(long, short = 'e', value_name = "REGEX")]
    pub exclude_regex: Option<String>,

    /// Collapse classes into their namespaces before rendering
    #[arg(long)]
    pub no_classes: bool,
}

#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct ImageArgs {
    /// Write to this file; extensions other than the markup one are rendered to an image
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep the generated markup next to a rendered image
    #[arg(long, requires = "output")]
    pub keep_source: bool,
}

#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct DsmArgs {
    /// Matrix format
    #[arg(long, short, value_enum, default_value_t = DsmFormat::Text)]
    pub format: DsmFormat,

    /// Write the matrix to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct TextArgs {
    /// Append the weight of every dependency
    #[arg(long)]
    pub weights: bool,
}

#[derive(Debug, Clone, Default, Args, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Report format
    #[arg(long, short, value_enum, default_value_t = MetricsFormat::Text)]
    pub format: MetricsFormat,
}

/// Command-specific options. The variant names the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOptions {
    Uml(ImageArgs),
    Dot(ImageArgs),
    Dsm(DsmArgs),
    Text(TextArgs),
    Metrics(MetricsArgs),
}

impl RenderOptions {
    pub fn kind(&self) -> CommandKind {
        match self {
            RenderOptions::Uml(_) => CommandKind::Uml,
            RenderOptions::Dot(_) => CommandKind::Dot,
            RenderOptions::Dsm(_) => CommandKind::Dsm,
            RenderOptions::Text(_) => CommandKind::Text,
            RenderOptions::Metrics(_) => CommandKind::Metrics,
        }
    }
}

/// Typed result of parsing an analysis command's arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArguments {
    pub input: InputArgs,
    pub filters: FilterArgs,
    pub render: RenderOptions,
}

impl ParsedArguments {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            quiet: self.input.quiet,
            include: self.input.include.clone(),
            exclude: self.input.exclude.clone(),
            internals: self.filters.internals,
            no_external: self.filters.no_external,
            filter_namespace: self.filters.filter_namespace.clone(),
            filter_from: self.filters.filter_from.clone(),
            depth: self.filters.depth,
            exclude_regex: self.filters.exclude_regex.clone(),
            no_classes: self.filters.no_classes,
        }
    }
}

/// Resolve and execute one invocation, returning the process exit code.
pub fn run(invocation: &RawInvocation, out: &mut dyn Write) -> Result<u8> {
    let route = resolve::classify(invocation);
    tracing::debug!("route: {route:?}");

    let kind = match route {
        Route::Analyze(kind) => kind,
        diagnostic => {
            let renderer = help::diagnostic_renderer(diagnostic);
            return Command::diagnostic(renderer).execute(out).map(|o| o.code);
        }
    };

    let parsed = match resolve::parse_arguments(kind, &invocation.command_args(kind.name())) {
        Ok(parsed) => parsed,
        Err(err) => {
            err.print()?;
            return Ok(u8::try_from(err.exit_code()).unwrap_or(Outcome::USAGE));
        }
    };

    let working_dir = std::env::current_dir()?;
    let config = resolve_config(&working_dir, &parsed.overrides())?;
    let dispatcher = Dispatcher::new(config)?;
    dispatcher.dispatch(&parsed, out).map(|o| o.code)
}
