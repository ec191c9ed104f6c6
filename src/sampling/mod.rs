//! Distribution samplers resolved by name when a `Random` node is evaluated.
pub mod builtin;
pub mod params;
pub mod registry;

pub use params::Parameters;
pub use registry::{Sampler, SamplerRegistry};
