use crate::analyze::rust::RustAnalyzer;
use crate::analyze::trace::JsonTraceAnalyzer;
use crate::analyze::{DynamicTraceAnalyzer, StaticAnalyzer};
use crate::cli::{InputArgs, ParsedArguments, RenderOptions};
use crate::config::ResolvedConfig;
use crate::errors::{DeplensError, Result};
use crate::filter::{FilterPipeline, Transform};
use crate::graph::DependencyGraph;
use crate::output::dot::{self, DotRenderer};
use crate::output::dsm::DsmRenderer;
use crate::output::metrics::MetricsRenderer;
use crate::output::text::TextRenderer;
use crate::output::uml::{self, UmlRenderer};
use crate::output::{DiagramTarget, RenderedOutput, Renderer};
use crate::walk::{FsLocator, SourceFileLocator};
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

/// Exit status of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub code: u8,
}

impl Outcome {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const EXTERNAL_TOOL: u8 = 3;

    pub fn success() -> Self {
        Self {
            code: Self::SUCCESS,
        }
    }

    pub fn with_code(code: u8) -> Self {
        Self { code }
    }
}

/// A graph bound to its deferred post-processing and the renderer that
/// presents it.
pub struct Command {
    graph: DependencyGraph,
    post: Transform,
    renderer: Box<dyn Renderer>,
}

impl Command {
    pub fn new(graph: DependencyGraph, post: Transform, renderer: Box<dyn Renderer>) -> Self {
        Self {
            graph,
            post,
            renderer,
        }
    }

    /// A command that needs no analysis: empty graph, identity post-processing.
    pub fn diagnostic(renderer: Box<dyn Renderer>) -> Self {
        Self::new(DependencyGraph::new(), Transform::identity(), renderer)
    }

    pub fn execute(&self, out: &mut dyn Write) -> Result<Outcome> {
        let graph = if self.renderer.applies_post_filters() {
            Cow::Owned(self.post.apply(&self.graph))
        } else {
            Cow::Borrowed(&self.graph)
        };
        tracing::debug!(
            "{}: rendering {} entities, {} edges",
            self.renderer.name(),
            graph.entity_count(),
            graph.edge_count()
        );

        match self.renderer.render(&graph)? {
            RenderedOutput::Inline(text) => {
                out.write_all(text.as_bytes())?;
                out.flush()?;
            }
            RenderedOutput::File { path, contents } => {
                create_parent(&path)?;
                std::fs::write(&path, contents)?;
                tracing::info!("wrote {}", path.display());
            }
            RenderedOutput::External(invocation) => {
                create_parent(&invocation.output)?;
                match invocation.run() {
                    Ok(()) => tracing::info!("wrote {}", invocation.output.display()),
                    Err(err @ DeplensError::ExternalTool { .. }) => {
                        eprintln!("error: {err}");
                        return Ok(Outcome::with_code(Outcome::EXTERNAL_TOOL));
                    }
                    Err(err) => return Err(err),
                }
            }
            RenderedOutput::Failure { message, code } => {
                eprint!("{message}");
                return Ok(Outcome::with_code(code));
            }
        }
        Ok(Outcome::success())
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Builds the graph for an analysis command and runs it.
pub struct Dispatcher {
    config: ResolvedConfig,
    locator: Box<dyn SourceFileLocator>,
    static_analyzer: Box<dyn StaticAnalyzer>,
    dynamic_analyzer: Box<dyn DynamicTraceAnalyzer>,
}

impl Dispatcher {
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        let locator = FsLocator::new(&config.include, &config.exclude)?;
        let static_analyzer = RustAnalyzer::new().with_progress(!config.quiet);
        Ok(Self::with_collaborators(
            config,
            Box::new(locator),
            Box::new(static_analyzer),
            Box::new(JsonTraceAnalyzer),
        ))
    }

    pub fn with_collaborators(
        config: ResolvedConfig,
        locator: Box<dyn SourceFileLocator>,
        static_analyzer: Box<dyn StaticAnalyzer>,
        dynamic_analyzer: Box<dyn DynamicTraceAnalyzer>,
    ) -> Self {
        Self {
            config,
            locator,
            static_analyzer,
            dynamic_analyzer,
        }
    }

    /// Run an analysis command. A syntax error in the sources is reported on
    /// stderr and turns into exit code 1 with nothing written to `out`.
    pub fn dispatch(&self, args: &ParsedArguments, out: &mut dyn Write) -> Result<Outcome> {
        let pipeline = FilterPipeline::from_settings(&self.config.filters)?;

        let graph = match self.build_graph(&args.input) {
            Ok(graph) => graph,
            Err(err) if err.is_syntax_error() => {
                eprintln!("error: {err}");
                return Ok(Outcome::with_code(Outcome::FAILURE));
            }
            Err(err) => return Err(err),
        };

        let (pre, post) = pipeline.into_stages();
        let graph = pre.apply(&graph);
        let renderer = self.renderer_for(&args.render);
        Command::new(graph, post, renderer).execute(out)
    }

    fn build_graph(&self, input: &InputArgs) -> Result<DependencyGraph> {
        let files = self.locator.locate(&input.source)?;

        let graph = self.static_analyzer.analyze(&files)?;
        let Some(ref trace) = input.dynamic else {
            return Ok(graph);
        };

        let dynamic = self.dynamic_analyzer.analyze(trace)?;
        tracing::debug!(
            "merging {} dynamic edges with policy {:?}",
            dynamic.edge_count(),
            self.config.merge_weights
        );
        Ok(graph.merge(&dynamic, self.config.merge_weights))
    }

    fn renderer_for(&self, render: &RenderOptions) -> Box<dyn Renderer> {
        let tools = &self.config.tools;
        match render {
            RenderOptions::Uml(image) => Box::new(UmlRenderer {
                target: DiagramTarget::from_output(image.output.as_deref(), uml::MARKUP_EXTENSIONS),
                keep_source: image.keep_source,
                tool: tools.plantuml.clone(),
            }),
            RenderOptions::Dot(image) => Box::new(DotRenderer {
                target: DiagramTarget::from_output(image.output.as_deref(), dot::MARKUP_EXTENSIONS),
                keep_source: image.keep_source,
                tool: tools.dot.clone(),
            }),
            RenderOptions::Dsm(dsm) => Box::new(DsmRenderer {
                format: dsm.format,
                output: dsm.output.clone(),
            }),
            RenderOptions::Text(text) => Box::new(TextRenderer {
                weights: text.weights,
            }),
            RenderOptions::Metrics(metrics) => Box::new(MetricsRenderer {
                format: metrics.format,
            }),
        }
    }
}
