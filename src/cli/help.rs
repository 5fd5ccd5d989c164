use crate::cli::dispatch::Outcome;
use crate::cli::resolve::Route;
use crate::cli::schema::command_schema;
use crate::cli::self_test::SelfTestRenderer;
use crate::cli::{command_names, CommandKind, BIN_NAME, DIAGNOSTIC_COMMANDS};
use crate::errors::Result;
use crate::graph::DependencyGraph;
use crate::output::{RenderedOutput, Renderer};
use std::fmt::Write;
use strsim::levenshtein;

/// Renderer for a route that never reaches analysis.
pub fn diagnostic_renderer(route: Route) -> Box<dyn Renderer> {
    match route {
        Route::Help { topic } => Box::new(HelpRenderer { topic }),
        Route::Version => Box::new(VersionRenderer),
        Route::List => Box::new(ListRenderer),
        Route::SelfTest => Box::new(SelfTestRenderer),
        Route::Unknown(name) => Box::new(UnknownCommandRenderer { name }),
        Route::Analyze(kind) => Box::new(HelpRenderer {
            topic: Some(kind.name().to_string()),
        }),
    }
}

pub struct HelpRenderer {
    pub topic: Option<String>,
}

impl Renderer for HelpRenderer {
    fn name(&self) -> &'static str {
        "help"
    }

    fn render(&self, _graph: &DependencyGraph) -> Result<RenderedOutput> {
        let Some(topic) = self.topic.as_deref() else {
            return Ok(RenderedOutput::Inline(general_help()));
        };

        if let Some(kind) = CommandKind::from_name(topic) {
            let mut schema = command_schema(kind);
            return Ok(RenderedOutput::Inline(format!("{}\n", schema.render_long_help())));
        }

        match DIAGNOSTIC_COMMANDS.iter().find(|(name, _)| *name == topic) {
            Some(("help", _)) => Ok(RenderedOutput::Inline(general_help())),
            Some((name, about)) => Ok(RenderedOutput::Inline(format!(
                "{about}\n\nUsage: {BIN_NAME} {name}\n"
            ))),
            None => Ok(unknown_command(topic)),
        }
    }
}

pub struct VersionRenderer;

impl Renderer for VersionRenderer {
    fn name(&self) -> &'static str {
        "version"
    }

    fn render(&self, _graph: &DependencyGraph) -> Result<RenderedOutput> {
        Ok(RenderedOutput::Inline(format!(
            "{BIN_NAME} {}\n",
            env!("CARGO_PKG_VERSION")
        )))
    }
}

pub struct ListRenderer;

impl Renderer for ListRenderer {
    fn name(&self) -> &'static str {
        "list"
    }

    fn render(&self, _graph: &DependencyGraph) -> Result<RenderedOutput> {
        Ok(RenderedOutput::Inline(command_table()))
    }
}

pub struct UnknownCommandRenderer {
    pub name: String,
}

impl Renderer for UnknownCommandRenderer {
    fn name(&self) -> &'static str {
        "unknown"
    }

    fn render(&self, _graph: &DependencyGraph) -> Result<RenderedOutput> {
        Ok(unknown_command(&self.name))
    }
}

fn unknown_command(name: &str) -> RenderedOutput {
    let mut message = format!("Command \"{name}\" is not defined.\n\n");
    if let Some(suggestion) = closest_command(name) {
        let _ = writeln!(message, "Did you mean \"{suggestion}\"?\n");
    }
    message.push_str("Available commands:\n");
    message.push_str(&command_table());
    RenderedOutput::Failure {
        message,
        code: Outcome::USAGE,
    }
}

/// Closest known command name, if it is near enough to be a typo.
pub fn closest_command(name: &str) -> Option<&'static str> {
    let threshold = (name.len() / 2).max(2);
    command_names()
        .map(|candidate| (candidate, levenshtein(name, candidate)))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

fn command_table() -> String {
    let mut out = String::new();
    for kind in CommandKind::ALL {
        let _ = writeln!(out, "  {:<10} {}", kind.name(), kind.about());
    }
    for (name, about) in DIAGNOSTIC_COMMANDS {
        let _ = writeln!(out, "  {name:<10} {about}");
    }
    out
}

fn general_help() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{BIN_NAME} {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "{}", env!("CARGO_PKG_DESCRIPTION"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Usage: {BIN_NAME} <COMMAND> [OPTIONS] <SOURCE>...");
    let _ = writeln!(out);
    let _ = writeln!(out, "Commands:");
    out.push_str(&command_table());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Run `{BIN_NAME} help <COMMAND>` for the options of a command."
    );
    out
}
