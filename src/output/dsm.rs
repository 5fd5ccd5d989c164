use crate::errors::Result;
use crate::graph::DependencyGraph;
use crate::output::{RenderedOutput, Renderer};
use clap::ValueEnum;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DsmFormat {
    #[default]
    Text,
    Html,
}

/// Dependency structure matrix. Row `i`, column `j` holds the weight of the
/// dependency from entity `i` to entity `j`.
#[derive(Debug, Clone, Default)]
pub struct DsmRenderer {
    pub format: DsmFormat,
    pub output: Option<PathBuf>,
}

impl Renderer for DsmRenderer {
    fn name(&self) -> &'static str {
        "dsm"
    }

    fn render(&self, graph: &DependencyGraph) -> Result<RenderedOutput> {
        let matrix = Matrix::from_graph(graph);
        let contents = match self.format {
            DsmFormat::Text => matrix.to_text(),
            DsmFormat::Html => matrix.to_html(),
        };
        Ok(match &self.output {
            Some(path) => RenderedOutput::File {
                path: path.clone(),
                contents,
            },
            None => RenderedOutput::Inline(contents),
        })
    }
}

/// Entity names in graph order plus, per row, the weighted columns that are
/// actually set. Empty cells are never stored.
struct Matrix<'a> {
    names: Vec<&'a str>,
    rows: Vec<BTreeMap<usize, usize>>,
}

impl<'a> Matrix<'a> {
    fn from_graph(graph: &'a DependencyGraph) -> Self {
        let names: Vec<&str> = graph.entities().map(|(name, _)| name).collect();
        let index: HashMap<&str, usize> =
            names.iter().enumerate().map(|(i, name)| (*name, i)).collect();
        let rows = names
            .iter()
            .map(|from| {
                graph
                    .dependencies_of(from)
                    .filter_map(|(to, weight)| index.get(to).map(|&j| (j, weight)))
                    .collect()
            })
            .collect();
        Self { names, rows }
    }

    fn cell(&self, row: usize, column: usize) -> Option<usize> {
        self.rows[row].get(&column).copied()
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        if self.names.is_empty() {
            return out;
        }

        let labels: Vec<String> = self
            .names
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}: {name}", i + 1))
            .collect();
        let label_width = labels.iter().map(String::len).max().unwrap_or(0);
        let max_weight = self
            .rows
            .iter()
            .flat_map(BTreeMap::values)
            .max()
            .copied()
            .unwrap_or(0);
        let cell_width = self
            .names
            .len()
            .to_string()
            .len()
            .max(max_weight.to_string().len());

        let _ = write!(out, "{:label_width$} |", "");
        for i in 1..=self.names.len() {
            let _ = write!(out, " {i:>cell_width$} |");
        }
        out.push('\n');

        for (i, label) in labels.iter().enumerate() {
            let _ = write!(out, "{label:<label_width$} |");
            for j in 0..self.names.len() {
                let text = match self.cell(i, j) {
                    _ if i == j => "-".to_string(),
                    Some(weight) => weight.to_string(),
                    None => String::new(),
                };
                let _ = write!(out, " {text:>cell_width$} |");
            }
            out.push('\n');
        }
        out
    }

    fn to_html(&self) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>Dependency Structure Matrix</title>\n");
        out.push_str(
            "<style>table{border-collapse:collapse;font-family:monospace}\
             td,th{border:1px solid #999;padding:2px 6px;text-align:center}\
             th.name{text-align:left}td.self{background:#ddd}</style>\n",
        );
        out.push_str("</head>\n<body>\n<table>\n<tr><th></th>");
        for i in 1..=self.names.len() {
            let _ = write!(out, "<th>{i}</th>");
        }
        out.push_str("</tr>\n");

        for (i, name) in self.names.iter().enumerate() {
            let _ = write!(out, "<tr><th class=\"name\">{}: {}</th>", i + 1, escape_html(name));
            for j in 0..self.names.len() {
                match self.cell(i, j) {
                    _ if i == j => out.push_str("<td class=\"self\"></td>"),
                    Some(weight) => {
                        let _ = write!(out, "<td>{weight}</td>");
                    }
                    None => out.push_str("<td></td>"),
                }
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</table>\n</body>\n</html>\n");
        out
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
