//! registry.rs
//! Name-to-sampler resolution for `Random` nodes.

use super::builtin;
use super::params::Parameters;
use crate::error::Result;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Produces `nsim` draws of a distribution from the graph's random stream.
pub trait Sampler: Send + Sync {
    fn sample(&self, params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>>;
}

impl<F> Sampler for F
where
    F: Fn(&Parameters, usize, &mut StdRng) -> Result<Vec<f64>> + Send + Sync,
{
    fn sample(&self, params: &Parameters, nsim: usize, rng: &mut StdRng) -> Result<Vec<f64>> {
        self(params, nsim, rng)
    }
}

#[derive(Clone, Default)]
pub struct SamplerRegistry {
    samplers: HashMap<String, Arc<dyn Sampler>>,
}

impl SamplerRegistry {
    /// An empty registry.
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("binomial", builtin::binomial);
        reg.register("triangular", builtin::triangular);
        reg.register("gamma", builtin::gamma);
        reg.register("normal", builtin::normal);
        reg.register("uniform", builtin::uniform);
        reg.register("poisson", builtin::poisson);
        reg.register("lognormal", builtin::lognormal);
        reg.register("exponential", builtin::exponential);
        reg.register("beta", builtin::beta);
        reg
    }

    /// Registers a sampling function under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Parameters, usize, &mut StdRng) -> Result<Vec<f64>> + Send + Sync + 'static,
    {
        self.samplers.insert(name.into(), Arc::new(f));
    }

    /// Registers a user type implementing `Sampler`.
    pub fn register_sampler(&mut self, name: impl Into<String>, sampler: impl Sampler + 'static) {
        self.samplers.insert(name.into(), Arc::new(sampler));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Sampler>> {
        self.samplers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool { self.samplers.contains_key(name) }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.samplers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for SamplerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SamplerRegistry").field("samplers", &self.names()).finish()
    }
}
