//! Node arena: identifiers, roles, metadata and edges.
pub mod registry;
pub mod types;

pub use registry::Registry;
pub use types::{Edge, GraphType, NodeId, NodeKind, NodeMetadata, Role};
