pub mod spec;

pub use spec::{load_model, parse_model, ModelError, ModelSpec, NodeSpec};
