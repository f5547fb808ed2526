//! JSON renderer over the structural exports.

use log::debug;

use topograph_core::semantic::GraphDescription;

use super::Renderer;
use crate::{
    config::OutputFormat,
    error::TopographError,
    export::{ExportFormat, export},
};

/// Writes a structural export as pretty-printed JSON.
#[derive(Debug, Clone, Copy)]
pub struct JsonRenderer {
    export_format: ExportFormat,
}

impl JsonRenderer {
    pub fn new(export_format: ExportFormat) -> Self {
        Self { export_format }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, graph: &GraphDescription) -> Result<Vec<u8>, TopographError> {
        let mut bytes = serde_json::to_vec_pretty(&export(graph, self.export_format))?;
        bytes.push(b'\n');
        debug!(bytes = bytes.len(); "JSON rendered");
        Ok(bytes)
    }

    fn format(&self) -> OutputFormat {
        match self.export_format {
            ExportFormat::AdjacencyList => OutputFormat::JsonEdges,
            ExportFormat::Tree => OutputFormat::JsonTree,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use topograph_core::{
        identifier::Id,
        semantic::{Cluster, Direction, Edge, Node},
    };

    use super::*;

    fn graph() -> GraphDescription {
        let cluster = Cluster::new(
            Id::new("plane"),
            "EKS Control Plane",
            vec![Node::new(Id::new("eks"), "EKS Cluster", "aws.compute").into()],
        );
        GraphDescription::new(
            "Json",
            Direction::TopToBottom,
            vec![Node::new(Id::new("cw"), "CloudWatch", "aws.management").into(), cluster.into()],
            vec![Edge::new(vec![Id::new("eks")], vec![Id::new("cw")], Some("logs".to_string()))],
        )
        .unwrap()
    }

    #[test]
    fn test_edges_json() {
        let bytes = JsonRenderer::new(ExportFormat::AdjacencyList)
            .render(&graph())
            .unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            value,
            json!([{ "from": "plane::eks", "to": "cw", "label": "logs" }])
        );
    }

    #[test]
    fn test_tree_json() {
        let bytes = JsonRenderer::new(ExportFormat::Tree).render(&graph()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["title"], "Json");
        assert_eq!(value["direction"], "TB");
        assert_eq!(value["children"][0]["kind"], "node");
        assert_eq!(value["children"][1]["kind"], "cluster");
        assert_eq!(value["children"][1]["children"][0]["path"], "plane::eks");
        assert_eq!(value["edges"][0]["sources"], json!(["plane::eks"]));
    }
}
