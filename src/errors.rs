use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an analyzer collaborator.
#[derive(Error, Diagnostic, Debug)]
pub enum AnalysisError {
    #[error("Syntax error in {file} at line {line}, column {column}: {message}")]
    #[diagnostic(code(deplens::syntax))]
    Syntax {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Could not read {path}: {source}")]
    #[diagnostic(code(deplens::read))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid trace file {path}: {message}")]
    #[diagnostic(code(deplens::trace))]
    Trace { path: PathBuf, message: String },
}

#[derive(Error, Diagnostic, Debug)]
pub enum DeplensError {
    #[error("No analyzable files found in {path}")]
    #[diagnostic(code(deplens::no_files))]
    NoFiles { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(deplens::config))]
    Config(String),

    #[error("{tool} failed: {message}")]
    #[diagnostic(code(deplens::external_tool))]
    ExternalTool { tool: String, message: String },

    #[error(transparent)]
    #[diagnostic(code(deplens::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(deplens::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(deplens::glob))]
    Glob(#[from] globset::Error),

    #[error("Invalid exclude pattern: {0}")]
    #[diagnostic(code(deplens::regex))]
    Regex(#[from] regex::Error),
}

impl DeplensError {
    /// True when the static analyzer could not parse its input.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, DeplensError::Analysis(AnalysisError::Syntax { .. }))
    }
}

pub type Result<T> = std::result::Result<T, DeplensError>;
