//! registry.rs
//! Name-to-combiner resolution for `Operation` and `Goal` nodes.

use super::args::Arguments;
use super::builtin;
use super::context::CombineContext;
use crate::compute::Value;
use crate::error::Result;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Computes a node's value from its bound arguments.
pub trait Combiner: Send + Sync {
    fn combine(&self, ctx: &mut CombineContext<'_>, args: &Arguments) -> Result<Value>;

    /// Argument names the combiner accepts. `None` accepts any binding.
    fn parameters(&self) -> Option<&[String]> { None }
}

impl<F> Combiner for F
where
    F: Fn(&mut CombineContext<'_>, &Arguments) -> Result<Value> + Send + Sync,
{
    fn combine(&self, ctx: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
        self(ctx, args)
    }
}

/// A combiner with a declared argument list.
struct Declared<C> {
    params: Vec<String>,
    inner: C,
}

impl<C: Combiner> Combiner for Declared<C> {
    fn combine(&self, ctx: &mut CombineContext<'_>, args: &Arguments) -> Result<Value> {
        self.inner.combine(ctx, args)
    }

    fn parameters(&self) -> Option<&[String]> { Some(&self.params) }
}

#[derive(Clone, Default)]
pub struct CombinerRegistry {
    combiners: HashMap<String, Arc<dyn Combiner>>,
}

impl CombinerRegistry {
    /// An empty registry.
    pub fn new() -> Self { Self::default() }

    pub fn with_builtins() -> Self {
        let mut reg = Self::new();
        reg.register("add", builtin::add);
        reg.register("subtract", builtin::subtract);
        reg.register("multiply", builtin::multiply);
        reg.register("divide", builtin::divide);
        reg.register("minimum", builtin::minimum);
        reg.register("maximum", builtin::maximum);
        reg.register("mean", builtin::mean);
        reg.register("greater_than", builtin::greater_than);
        reg.register("less_than", builtin::less_than);
        reg.register("negate", builtin::negate);
        reg
    }

    /// Registers a function or closure accepting any argument names.
    pub fn register<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&mut CombineContext<'_>, &Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        self.combiners.insert(name.into(), Arc::new(f));
    }

    /// Registers a function or closure that accepts exactly `params`.
    /// Evaluation fails with a binding error when the node's edges bind anything else.
    pub fn register_with_params<F>(&mut self, name: impl Into<String>, params: &[&str], f: F)
    where
        F: Fn(&mut CombineContext<'_>, &Arguments) -> Result<Value> + Send + Sync + 'static,
    {
        let params = params.iter().map(|p| p.to_string()).collect();
        self.combiners.insert(name.into(), Arc::new(Declared { params, inner: f }));
    }

    /// Registers a user type implementing `Combiner`.
    pub fn register_combiner(&mut self, name: impl Into<String>, combiner: impl Combiner + 'static) {
        self.combiners.insert(name.into(), Arc::new(combiner));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Combiner>> {
        self.combiners.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool { self.combiners.contains_key(name) }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.combiners.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CombinerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombinerRegistry").field("combiners", &self.names()).finish()
    }
}
