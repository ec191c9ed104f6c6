//! error.rs
//! Error taxonomy shared by declaration, evaluation and statistics.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node '{name}' already exists")]
    DuplicateNode { name: String },
    #[error("Unknown node '{name}'")]
    UnknownNode { name: String },
    #[error("Node '{node}' uses unknown distribution '{distribution}'")]
    UnknownDistribution { node: String, distribution: String },
    #[error("Node '{node}' uses unknown operation '{operation}'")]
    UnknownOperation { node: String, operation: String },
    #[error("Cycle detected through node '{node}'")]
    CyclicGraph { node: String },
    #[error("Node '{name}' has not been evaluated")]
    NotEvaluated { name: String },
    #[error("Parameter binding failed for '{target}': {message}")]
    ParameterBinding { target: String, message: String },
    #[error("Invalid parameters for '{distribution}': {reason}")]
    InvalidParameters { distribution: String, reason: String },
    #[error("Shape mismatch: series of length {left} combined with length {right}")]
    ShapeMismatch { left: usize, right: usize },
    #[error("Value of '{name}' is not numeric")]
    NonNumeric { name: String },
    #[error("Node '{name}' has role {role} which cannot be evaluated")]
    UnsupportedRole { name: String, role: String },
    #[error("Operation '{operation}' failed: {message}")]
    OperationFailed { operation: String, message: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GraphError {
    pub(crate) fn binding(target: impl Into<String>, message: impl Into<String>) -> Self {
        GraphError::ParameterBinding { target: target.into(), message: message.into() }
    }
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
