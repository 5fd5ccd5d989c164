use crate::cli::schema::command_schema;
use crate::cli::{
    CommandKind, DsmArgs, FilterArgs, ImageArgs, InputArgs, MetricsArgs, ParsedArguments,
    RenderOptions, TextArgs, BIN_NAME,
};
use clap::FromArgMatches;

/// Process arguments, captured once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl RawInvocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a full argv, program name first.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next().unwrap_or_else(|| BIN_NAME.to_string());
        Self {
            program,
            args: argv.collect(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_argv(std::env::args_os().map(|a| a.to_string_lossy().into_owned()))
    }

    fn non_flag_tokens(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str).filter(|t| !is_flag(t))
    }

    /// Arguments with the first occurrence of the command name removed.
    pub fn command_args(&self, command: &str) -> Vec<String> {
        let mut args = self.args.clone();
        if let Some(pos) = args.iter().position(|t| t == command) {
            args.remove(pos);
        }
        args
    }
}

/// Outcome of the raw scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Help { topic: Option<String> },
    Version,
    List,
    SelfTest,
    Analyze(CommandKind),
    Unknown(String),
}

impl Route {
    pub fn needs_analysis(&self) -> bool {
        matches!(self, Route::Analyze(_))
    }
}

fn is_flag(token: &str) -> bool {
    token.starts_with('-')
}

/// Decide which command was requested by looking at raw tokens only.
pub fn classify(invocation: &RawInvocation) -> Route {
    let mut positionals = invocation.non_flag_tokens();

    if invocation.args.iter().any(|t| t == "-h" || t == "--help") {
        let topic = match positionals.next() {
            Some("help") => positionals.next(),
            other => other,
        };
        return Route::Help {
            topic: topic.map(str::to_string),
        };
    }

    if invocation
        .args
        .first()
        .is_some_and(|t| t == "-V" || t == "--version")
    {
        return Route::Version;
    }

    match positionals.next() {
        None => Route::Help { topic: None },
        Some("help") => Route::Help {
            topic: positionals.next().map(str::to_string),
        },
        Some("list") => Route::List,
        Some("self-test") => Route::SelfTest,
        Some(name) => match CommandKind::from_name(name) {
            Some(kind) => Route::Analyze(kind),
            None => Route::Unknown(name.to_string()),
        },
    }
}

/// Parse the tokens following the command name against its schema.
pub fn parse_arguments(
    kind: CommandKind,
    tokens: &[String],
) -> Result<ParsedArguments, clap::Error> {
    let matches = command_schema(kind).try_get_matches_from(tokens)?;

    let render = match kind {
        CommandKind::Uml => RenderOptions::Uml(ImageArgs::from_arg_matches(&matches)?),
        CommandKind::Dot => RenderOptions::Dot(ImageArgs::from_arg_matches(&matches)?),
        CommandKind::Dsm => RenderOptions::Dsm(DsmArgs::from_arg_matches(&matches)?),
        CommandKind::Text => RenderOptions::Text(TextArgs::from_arg_matches(&matches)?),
        CommandKind::Metrics => RenderOptions::Metrics(MetricsArgs::from_arg_matches(&matches)?),
    };

    Ok(ParsedArguments {
        input: InputArgs::from_arg_matches(&matches)?,
        filters: FilterArgs::from_arg_matches(&matches)?,
        render,
    })
}
