//! context.rs
//! What a combining function may use besides its arguments.

use crate::error::{GraphError, Result};
use crate::sampling::{Parameters, SamplerRegistry};
use rand::rngs::StdRng;

/// Gives combiners access to the graph's random stream, so operations such as
/// "number of competing bids" can draw their own samples deterministically.
pub struct CombineContext<'a> {
    node: &'a str,
    nsim: usize,
    rng: &'a mut StdRng,
    samplers: &'a SamplerRegistry,
}

impl<'a> CombineContext<'a> {
    pub fn new(node: &'a str, nsim: usize, rng: &'a mut StdRng, samplers: &'a SamplerRegistry) -> Self {
        Self { node, nsim, rng, samplers }
    }

    /// Name of the node being evaluated.
    pub fn node(&self) -> &str { self.node }

    pub fn nsim(&self) -> usize { self.nsim }

    pub fn rng(&mut self) -> &mut StdRng { &mut *self.rng }

    /// `nsim` draws from a registered distribution.
    pub fn sample(&mut self, distribution: &str, params: &Parameters) -> Result<Vec<f64>> {
        self.sample_n(distribution, params, self.nsim)
    }

    /// `size` draws from a registered distribution.
    pub fn sample_n(&mut self, distribution: &str, params: &Parameters, size: usize) -> Result<Vec<f64>> {
        let sampler = self.samplers.get(distribution).ok_or_else(|| GraphError::UnknownDistribution {
            node: self.node.to_string(),
            distribution: distribution.to_string(),
        })?;
        sampler.sample(params, size, &mut *self.rng)
    }
}
