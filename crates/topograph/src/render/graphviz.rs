//! Graphviz renderer.
//!
//! Converts a [`GraphDescription`] into a DOT digraph: clusters become
//! `cluster_*` subgraphs (so Graphviz draws a box around them), the graph
//! direction becomes `rankdir`, and node categories map to configured
//! shapes and colors. PNG and SVG output shell out to the `dot` executable.

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node as DotNode,
    NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    exec,
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, info};

use topograph_core::{
    identifier::Id,
    semantic::{Child, Cluster, GraphDescription, Node},
};

use super::Renderer;
use crate::{
    config::{OutputFormat, StyleConfig},
    error::TopographError,
};

const EDGE_COLOR: &str = "#7b8894";

/// Renders graphs through Graphviz.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    format: OutputFormat,
    style: StyleConfig,
    background: Option<String>,
    cluster_colors: Vec<String>,
}

impl GraphvizRenderer {
    /// Creates a renderer for `format`, validating every color in `style`.
    ///
    /// # Errors
    ///
    /// Returns [`TopographError::Config`] for a non-Graphviz format or an
    /// invalid color.
    pub fn new(format: OutputFormat, style: &StyleConfig) -> Result<Self, TopographError> {
        if !matches!(
            format,
            OutputFormat::Png | OutputFormat::Svg | OutputFormat::Dot
        ) {
            return Err(TopographError::Config(format!(
                "Graphviz cannot produce `{format}` output"
            )));
        }

        let background = style
            .background_color()
            .map_err(TopographError::Config)?
            .map(|color| color.to_hex());
        let cluster_colors = style
            .cluster_colors()
            .map_err(TopographError::Config)?
            .into_iter()
            .map(|color| color.to_hex())
            .collect();
        for (name, category) in style.categories() {
            category
                .fill_color()
                .and(category.font_color())
                .map_err(|err| TopographError::Config(format!("category `{name}`: {err}")))?;
        }

        Ok(Self {
            format,
            style: style.clone(),
            background,
            cluster_colors,
        })
    }

    /// Builds the DOT graph for `graph`.
    pub fn to_dot(&self, graph: &GraphDescription) -> Graph {
        let font_size = self.style.font_size();

        let mut graph_attributes = vec![
            attr("label", graph.title()),
            plain("labelloc", "t"),
            plain("rankdir", graph.direction().to_string()),
            plain("fontsize", font_size.to_string()),
            plain("compound", "true"),
        ];
        if let Some(background) = &self.background {
            graph_attributes.push(attr("bgcolor", background));
        }

        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(graph_attributes)),
            Stmt::GAttribute(GraphAttributes::Node(vec![
                attr("shape", self.style.default_shape()),
                attr("style", "rounded,filled"),
                attr("fillcolor", "#ffffff"),
                plain("fontsize", font_size.saturating_sub(2).to_string()),
            ])),
            Stmt::GAttribute(GraphAttributes::Edge(vec![attr("color", EDGE_COLOR)])),
        ];

        stmts.extend(
            graph
                .children()
                .iter()
                .map(|child| self.child_stmt(child, None, 0)),
        );

        for edge in graph.edges() {
            stmts.extend(edge.pairs().map(|(source, destination)| {
                let mut attributes = Vec::new();
                if let Some(label) = edge.label() {
                    attributes.push(attr("label", label));
                }
                Stmt::Edge(DotEdge {
                    ty: EdgeTy::Pair(Vertex::N(node_id(source)), Vertex::N(node_id(destination))),
                    attributes,
                })
            }));
        }

        Graph::DiGraph {
            id: escaped(graph.title()),
            strict: false,
            stmts,
        }
    }

    fn child_stmt(&self, child: &Child, parent: Option<Id>, depth: usize) -> Stmt {
        match child {
            Child::Node(node) => Stmt::Node(self.node(node)),
            Child::Cluster(cluster) => Stmt::Subgraph(self.subgraph(cluster, parent, depth)),
        }
    }

    fn node(&self, node: &Node) -> DotNode {
        let mut attributes = vec![attr("label", node.label())];

        if let Some(category) = self.style.category_style(node.category()) {
            if let Some(shape) = category.shape() {
                attributes.push(attr("shape", shape));
            }
            if let Ok(Some(fill)) = category.fill_color() {
                attributes.push(attr("fillcolor", fill.to_hex()));
            }
            if let Ok(Some(font)) = category.font_color() {
                attributes.push(attr("fontcolor", font.to_hex()));
            }
        }
        attributes.push(attr("tooltip", node.category()));

        DotNode {
            id: node_id(node.id()),
            attributes,
        }
    }

    fn subgraph(&self, cluster: &Cluster, parent: Option<Id>, depth: usize) -> Subgraph {
        let path = match parent {
            Some(parent) => parent.create_nested(cluster.id()),
            None => cluster.id(),
        };

        let mut stmts = vec![
            Stmt::Attribute(attr("label", cluster.label())),
            Stmt::Attribute(attr("style", "rounded,filled")),
            Stmt::Attribute(plain("labeljust", "l")),
            Stmt::Attribute(plain(
                "fontsize",
                self.style.font_size().saturating_sub(3).to_string(),
            )),
        ];
        if !self.cluster_colors.is_empty() {
            let color = &self.cluster_colors[depth % self.cluster_colors.len()];
            stmts.push(Stmt::Attribute(attr("fillcolor", color)));
        }

        stmts.extend(
            cluster
                .children()
                .iter()
                .map(|child| self.child_stmt(child, Some(path), depth + 1)),
        );

        Subgraph {
            id: escaped(format!("cluster_{path}")),
            stmts,
        }
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, graph: &GraphDescription) -> Result<Vec<u8>, TopographError> {
        let dot = self.to_dot(graph);
        let mut ctx = PrinterContext::default();

        let format = match self.format {
            OutputFormat::Png => Format::Png,
            OutputFormat::Svg => Format::Svg,
            _ => {
                let source = dot.print(&mut ctx);
                debug!(bytes = source.len(); "DOT source printed");
                return Ok(source.into_bytes());
            }
        };

        info!(format:? = self.format; "Invoking Graphviz");
        exec(dot, &mut ctx, vec![CommandArg::Format(format)])
            .map_err(|err| TopographError::Render(Box::new(err)))
    }

    fn format(&self) -> OutputFormat {
        self.format
    }
}

/// Quotes `value` as a DOT string, escaping quotes, backslashes and
/// newlines.
fn escaped(value: impl AsRef<str>) -> DotId {
    let value = value
        .as_ref()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    DotId::Escaped(format!("\"{value}\""))
}

fn attr(key: &str, value: impl AsRef<str>) -> Attribute {
    Attribute(DotId::Plain(key.to_string()), escaped(value))
}

fn plain(key: &str, value: impl Into<String>) -> Attribute {
    Attribute(DotId::Plain(key.to_string()), DotId::Plain(value.into()))
}

fn node_id(id: Id) -> NodeId {
    NodeId(escaped(id.to_string()), None)
}
