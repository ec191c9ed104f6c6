//! spec.rs
//! Declarative JSON model files.

use crate::compute::Value;
use crate::config::ScenarioConfig;
use crate::error::GraphError;
use crate::sampling::Parameters;
use crate::scenario::{Incoming, ScenarioGraph};
use crate::store::GraphType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed model: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A whole model: simulation settings plus node declarations in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default)]
    pub config: ScenarioConfig,
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSpec {
    Input {
        name: String,
        value: Value,
        #[serde(default)]
        description: String,
        #[serde(default)]
        graph_type: Option<GraphType>,
    },
    Random {
        name: String,
        distribution: String,
        #[serde(default)]
        parameters: Parameters,
        #[serde(default)]
        description: String,
        #[serde(default)]
        graph_type: Option<GraphType>,
    },
    Operation {
        name: String,
        operation: String,
        #[serde(default = "Incoming::none")]
        incoming: Incoming,
        #[serde(default)]
        description: String,
        #[serde(default)]
        graph_type: Option<GraphType>,
    },
    Goal {
        name: String,
        operation: String,
        #[serde(default = "Incoming::none")]
        incoming: Incoming,
        #[serde(default)]
        description: String,
        #[serde(default)]
        graph_type: Option<GraphType>,
    },
    Decision {
        name: String,
        condition: String,
        #[serde(default = "Incoming::none")]
        incoming: Incoming,
        #[serde(default)]
        parameters: Parameters,
        #[serde(default)]
        description: String,
        #[serde(default)]
        graph_type: Option<GraphType>,
    },
}

impl NodeSpec {
    pub fn name(&self) -> &str {
        match self {
            NodeSpec::Input { name, .. }
            | NodeSpec::Random { name, .. }
            | NodeSpec::Operation { name, .. }
            | NodeSpec::Goal { name, .. }
            | NodeSpec::Decision { name, .. } => name,
        }
    }

    fn graph_type(&self) -> Option<GraphType> {
        match self {
            NodeSpec::Input { graph_type, .. }
            | NodeSpec::Random { graph_type, .. }
            | NodeSpec::Operation { graph_type, .. }
            | NodeSpec::Goal { graph_type, .. }
            | NodeSpec::Decision { graph_type, .. } => *graph_type,
        }
    }

    fn declare(&self, graph: &mut ScenarioGraph) -> Result<(), GraphError> {
        match self {
            NodeSpec::Input { name, value, description, .. } => {
                graph.add_input(name, value.clone(), description)?;
            }
            NodeSpec::Random { name, distribution, parameters, description, .. } => {
                graph.add_random(name, distribution, parameters.clone(), description)?;
            }
            NodeSpec::Operation { name, operation, incoming, description, .. } => {
                graph.add_operation(name, operation, incoming.clone(), description)?;
            }
            NodeSpec::Goal { name, operation, incoming, description, .. } => {
                graph.add_goal(name, operation, incoming.clone(), description)?;
            }
            NodeSpec::Decision { name, condition, incoming, parameters, description, .. } => {
                graph.add_decision(name, incoming.clone(), condition, parameters.clone(), description)?;
            }
        }
        if let Some(graph_type) = self.graph_type() {
            graph.set_graph_type(self.name(), graph_type)?;
        }
        Ok(())
    }
}

impl ModelSpec {
    /// A graph with the built-in registries and this model's settings.
    pub fn build(&self) -> Result<ScenarioGraph, ModelError> {
        self.build_with(self.config)
    }

    /// Like [`ModelSpec::build`], with `config` replacing the file's settings.
    pub fn build_with(&self, config: ScenarioConfig) -> Result<ScenarioGraph, ModelError> {
        let mut graph = ScenarioGraph::new(config)?;
        self.populate(&mut graph)?;
        Ok(graph)
    }

    /// Declares every node into an existing graph, e.g. one carrying
    /// custom samplers or combiners.
    pub fn populate(&self, graph: &mut ScenarioGraph) -> Result<(), ModelError> {
        for node in &self.nodes {
            node.declare(graph)?;
        }
        debug!(nodes = self.nodes.len(), "model declared");
        Ok(())
    }
}

pub fn parse_model(source: &str) -> Result<ModelSpec, ModelError> {
    let spec: ModelSpec = serde_json::from_str(source)?;
    spec.config.validate()?;
    Ok(spec)
}

pub fn load_model(path: impl AsRef<Path>) -> Result<ModelSpec, ModelError> {
    let source = std::fs::read_to_string(path)?;
    parse_model(&source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MODEL: &str = r#"{
        "config": {"seed": 7, "nsim": 50},
        "nodes": [
            {"kind": "goal", "name": "margin", "operation": "subtract",
             "incoming": ["price", "cost"], "graph_type": "histogram"},
            {"kind": "input", "name": "price", "value": 120.0},
            {"kind": "random", "name": "cost", "distribution": "normal",
             "parameters": {"loc": 100.0, "scale": 5.0}, "description": "unit cost"},
            {"kind": "decision", "name": "go", "condition": "margin > 0", "incoming": {"margin": "m"}}
        ]
    }"#;

    #[test]
    fn test_parse_and_build_out_of_order() {
        let spec = parse_model(MODEL).unwrap();
        assert_eq!(spec.config, ScenarioConfig::new(7, 50));
        assert_eq!(spec.nodes[3].name(), "go");

        let mut graph = spec.build().unwrap();
        assert_eq!(graph.goal_nodes(), vec!["margin"]);
        assert_eq!(graph.node("cost").unwrap().description, "unit cost");
        assert_eq!(graph.predecessors("go").unwrap(), vec![("margin", Some("m"))]);

        let margin = graph.eval("margin").unwrap();
        assert_eq!(margin.len(), 50);
    }

    #[test]
    fn test_object_bindings_keep_operand_roles() {
        for incoming in [r#"{"revenue": "lhs", "cost": "rhs"}"#, r#"{"cost": "rhs", "revenue": "lhs"}"#] {
            let src = format!(
                r#"{{"nodes": [
                    {{"kind": "input", "name": "revenue", "value": 100.0}},
                    {{"kind": "input", "name": "cost", "value": 30.0}},
                    {{"kind": "goal", "name": "profit", "operation": "subtract", "incoming": {}}}
                ]}}"#,
                incoming
            );
            let mut graph = parse_model(&src).unwrap().build().unwrap();
            assert_eq!(graph.eval("profit").unwrap(), Value::Scalar(70.0));
        }
    }

    #[test]
    fn test_build_with_overrides_config() {
        let spec = parse_model(MODEL).unwrap();
        let graph = spec.build_with(ScenarioConfig::new(1, 3)).unwrap();
        assert_eq!(graph.nsim(), 3);
        assert_eq!(graph.seed(), 1);
    }

    #[test]
    fn test_duplicate_declaration_is_graph_error() {
        let src = r#"{"nodes": [
            {"kind": "input", "name": "x", "value": 1.0},
            {"kind": "input", "name": "x", "value": 2.0}
        ]}"#;
        let err = parse_model(src).unwrap().build().unwrap_err();
        assert!(matches!(err, ModelError::Graph(GraphError::DuplicateNode { .. })));
    }

    #[test]
    fn test_bad_json_and_bad_config() {
        assert!(matches!(parse_model("{"), Err(ModelError::Parse(_))));
        let zero = r#"{"config": {"nsim": 0}, "nodes": []}"#;
        assert!(matches!(parse_model(zero), Err(ModelError::Graph(GraphError::InvalidConfig(_)))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MODEL.as_bytes()).unwrap();
        let spec = load_model(file.path()).unwrap();
        assert_eq!(spec.nodes.len(), 4);

        assert!(matches!(load_model("/nonexistent/model.json"), Err(ModelError::Io(_))));
    }
}
