//! The scenario graph and its declaration helpers.
pub mod graph;
pub mod incoming;

pub use graph::{NodeView, ScenarioGraph};
pub use incoming::Incoming;
