#![allow(dead_code)]

mod analyze;
mod cli;
mod config;
mod errors;
mod filter;
mod graph;
mod metrics;
mod output;
mod walk;

use cli::resolve::RawInvocation;
use miette::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let invocation = RawInvocation::from_env();
    let mut stdout = std::io::stdout().lock();
    let code = cli::run(&invocation, &mut stdout)?;
    Ok(ExitCode::from(code))
}
