use crate::compute::Value;
use crate::sampling::Parameters;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Input,
    Random,
    Operation,
    Decision,
    Goal,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Input => "input",
            Role::Random => "random",
            Role::Operation => "operation",
            Role::Decision => "decision",
            Role::Goal => "goal",
        };
        f.write_str(s)
    }
}

/// How the reporting layer should chart a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    #[default]
    Histogram,
    Pie,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    pub name: String,
    pub description: String,
    pub graph_type: GraphType,
}

impl NodeMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), graph_type: GraphType::default() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Referenced by an edge but not declared yet.
    Undeclared,
    Input(Value),
    Random { distribution: String, parameters: Parameters },
    Operation { operation: String },
    Goal { operation: String },
    /// Recorded only; there are no evaluation semantics for decisions.
    Decision { condition: String, parameters: Parameters },
}

impl NodeKind {
    pub fn role(&self) -> Option<Role> {
        match self {
            NodeKind::Undeclared => None,
            NodeKind::Input(_) => Some(Role::Input),
            NodeKind::Random { .. } => Some(Role::Random),
            NodeKind::Operation { .. } => Some(Role::Operation),
            NodeKind::Goal { .. } => Some(Role::Goal),
            NodeKind::Decision { .. } => Some(Role::Decision),
        }
    }
}

/// An incoming dependency, stored on the successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    /// Argument name of the successor's operation this value binds to.
    /// `None` binds by the source node's name.
    pub param: Option<String>,
}
