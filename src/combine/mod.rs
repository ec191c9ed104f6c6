//! Combining functions resolved by name when an `Operation` or `Goal` node is evaluated.
pub mod args;
pub mod builtin;
pub mod context;
pub mod registry;

pub use args::Arguments;
pub use context::CombineContext;
pub use registry::{Combiner, CombinerRegistry};
