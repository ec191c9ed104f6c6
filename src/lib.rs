//! Monte Carlo risk scenario graphs.
//!
//! A model is a DAG of named nodes: constant inputs, random variables drawn
//! from named distributions, and operations combining their predecessors.
//! Evaluating a goal node pulls every ancestor through one pass of `nsim`
//! simulated scenarios; the resulting samples are summarized with [`Stats`].

pub mod analysis;
pub mod combine;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod model;
pub mod sampling;
pub mod scenario;
pub mod store;

#[cfg(feature = "python")]
mod bindings;

pub use analysis::Stats;
pub use combine::{Arguments, CombineContext, Combiner, CombinerRegistry};
pub use compute::Value;
pub use config::ScenarioConfig;
pub use error::{GraphError, Result};
pub use sampling::{Parameters, Sampler, SamplerRegistry};
pub use scenario::{Incoming, NodeView, ScenarioGraph};
pub use store::{GraphType, NodeId, Role};
