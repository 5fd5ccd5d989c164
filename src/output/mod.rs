pub mod dot;
pub mod dsm;
pub mod metrics;
pub mod text;
pub mod uml;

use crate::errors::{DeplensError, Result};
use crate::graph::DependencyGraph;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Turns a (post-filtered) graph into something to show the user.
pub trait Renderer {
    fn name(&self) -> &'static str;

    /// Commands that need the graph as it left the pre-filter stage return false.
    fn applies_post_filters(&self) -> bool {
        true
    }

    fn render(&self, graph: &DependencyGraph) -> Result<RenderedOutput>;
}

/// What a renderer produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedOutput {
    /// Printed to the command's output stream.
    Inline(String),
    /// Written to a file the user asked for.
    File { path: PathBuf, contents: String },
    /// Handed to an external binary.
    External(ExternalInvocation),
    /// Printed to stderr; the command exits with `code`.
    Failure { message: String, code: u8 },
}

/// A blocking child-process call that turns generated markup into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// Markup piped to the child's stdin.
    pub input: String,
    pub output: PathBuf,
    /// The child writes the result to stdout instead of `output`.
    pub capture_stdout: bool,
    /// Where to keep a copy of the markup, if requested.
    pub keep_source: Option<PathBuf>,
}

impl ExternalInvocation {
    pub fn run(&self) -> Result<()> {
        let program = which::which(&self.program).map_err(|e| DeplensError::ExternalTool {
            tool: self.program.clone(),
            message: format!("not found on PATH ({e})"),
        })?;

        if let Some(ref source) = self.keep_source {
            std::fs::write(source, &self.input)?;
        }

        tracing::debug!("running {} {:?}", program.display(), self.args);
        let mut child = Command::new(&program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DeplensError::ExternalTool {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        // The child may exit before reading all of its input. Feed stdin from
        // its own thread so the exit status and stderr are still collected.
        let stdin = child.stdin.take();
        let (written, waited) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(self.input.as_bytes()),
                None => Ok(()),
            });
            let waited = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (written, waited)
        });
        let output = waited.map_err(|e| DeplensError::ExternalTool {
            tool: self.program.clone(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(DeplensError::ExternalTool {
                tool: self.program.clone(),
                message,
            });
        }

        if let Err(e) = written {
            return Err(DeplensError::ExternalTool {
                tool: self.program.clone(),
                message: format!("stopped reading its input ({e})"),
            });
        }

        if self.capture_stdout {
            std::fs::write(&self.output, &output.stdout)?;
        }
        Ok(())
    }
}

/// Where the output of a diagram command goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramTarget {
    Stdout,
    /// Markup written as-is.
    Markup(PathBuf),
    /// Rendered through the external tool into an image with this extension.
    Image { path: PathBuf, format: String },
}

impl DiagramTarget {
    /// Classify `--output` by extension: markup extensions are written
    /// verbatim, anything else is an image format for the external tool.
    pub fn from_output(output: Option<&Path>, markup_extensions: &[&str]) -> Self {
        let Some(path) = output else {
            return DiagramTarget::Stdout;
        };
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext {
            Some(ext) if !markup_extensions.contains(&ext.as_str()) => DiagramTarget::Image {
                path: path.to_path_buf(),
                format: ext,
            },
            _ => DiagramTarget::Markup(path.to_path_buf()),
        }
    }
}

/// Double-quote a name for DOT and PlantUML.
pub(crate) fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
