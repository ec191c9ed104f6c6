//! A synchronous, single-threaded evaluation engine.
//!
//! Each call to `Engine::run` is one evaluation pass: every ancestor of the
//! targets is evaluated exactly once, depth-first, and its value written to
//! the ledger. Memoization is per pass, so random nodes resample on each
//! new pass while every consumer within a pass sees the same draw.

use super::ledger::Ledger;
use super::value::Value;
use crate::analysis::topology;
use crate::combine::{Arguments, CombineContext, CombinerRegistry};
use crate::error::{GraphError, Result};
use crate::sampling::SamplerRegistry;
use crate::store::{NodeId, NodeKind, Registry, Role};
use rand::rngs::StdRng;
use tracing::{debug, info};

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    Visiting, // On the recursion stack; reaching it again means a cycle.
    Visited,
}

pub struct Engine<'a> {
    registry: &'a Registry,
    samplers: &'a SamplerRegistry,
    combiners: &'a CombinerRegistry,
    nsim: usize,
}

impl<'a> Engine<'a> {
    pub fn new(
        registry: &'a Registry,
        samplers: &'a SamplerRegistry,
        combiners: &'a CombinerRegistry,
        nsim: usize,
    ) -> Self {
        Self { registry, samplers, combiners, nsim }
    }

    /// Evaluates `targets` in a single pass and returns their values in order.
    ///
    /// On failure the pass aborts. Ancestors completed before the failure keep
    /// their new values; the failing node and the nodes waiting on it lose
    /// theirs. Either way, stored values downstream of anything re-evaluated
    /// here but not re-evaluated themselves are dropped, so the ledger never
    /// mixes draws from different passes along an edge.
    pub fn run(&self, targets: &[NodeId], ledger: &mut Ledger, rng: &mut StdRng) -> Result<Vec<Value>> {
        ledger.ensure_capacity(self.registry.count());
        let mut state = vec![VisitState::Unvisited; self.registry.count()];
        let mut evaluated = 0usize;

        let values = targets
            .iter()
            .map(|&target| self.visit(target, &mut state, ledger, rng, &mut evaluated))
            .collect::<Result<Vec<_>>>();

        let fresh: Vec<NodeId> = state
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == VisitState::Visited)
            .map(|(i, _)| NodeId::new(i))
            .collect();
        let stale = topology::downstream_from(self.registry, &fresh)
            .into_iter()
            .filter(|id| state[id.index()] != VisitState::Visited);
        let dropped = ledger.invalidate(stale);

        let values = values?;
        info!(targets = targets.len(), evaluated, dropped, "evaluation pass complete");
        Ok(values)
    }

    fn visit(
        &self,
        node: NodeId,
        state: &mut [VisitState],
        ledger: &mut Ledger,
        rng: &mut StdRng,
        evaluated: &mut usize,
    ) -> Result<Value> {
        let idx = node.index();
        match state[idx] {
            VisitState::Visited => {
                if let Some(value) = ledger.get(node) {
                    return Ok(value.clone());
                }
                return Err(GraphError::NotEvaluated { name: self.name(node) });
            }
            VisitState::Visiting => return Err(GraphError::CyclicGraph { node: self.name(node) }),
            VisitState::Unvisited => state[idx] = VisitState::Visiting,
        }

        let value = match self.evaluate(node, state, ledger, rng, evaluated) {
            Ok(value) => value,
            Err(e) => {
                ledger.invalidate([node]);
                return Err(e);
            }
        };

        debug!(node = self.registry.name(node), len = value.len(), "evaluated");
        ledger.insert(node, value.clone());
        state[idx] = VisitState::Visited;
        *evaluated += 1;
        Ok(value)
    }

    fn evaluate(
        &self,
        node: NodeId,
        state: &mut [VisitState],
        ledger: &mut Ledger,
        rng: &mut StdRng,
        evaluated: &mut usize,
    ) -> Result<Value> {
        let value = match &self.registry.kinds[node.index()] {
            NodeKind::Undeclared => return Err(GraphError::UnknownNode { name: self.name(node) }),
            NodeKind::Input(value) => value.clone(),
            NodeKind::Random { distribution, parameters } => {
                let sampler = self.samplers.get(distribution).ok_or_else(|| GraphError::UnknownDistribution {
                    node: self.name(node),
                    distribution: distribution.clone(),
                })?;
                Value::series(sampler.sample(parameters, self.nsim, rng)?)
            }
            NodeKind::Operation { operation } | NodeKind::Goal { operation } => {
                // 1. Evaluate predecessors in edge order
                let mut args = Arguments::new(operation.as_str());
                for edge in self.registry.get_parents(node) {
                    let value = self.visit(edge.source, state, ledger, rng, evaluated)?;
                    // 2. Explicit bindings win, otherwise bind by predecessor name
                    let key = match &edge.param {
                        Some(param) => param.clone(),
                        None => self.name(edge.source),
                    };
                    args.insert(key, value)?;
                }

                // 3. Resolve and invoke
                let combiner = self.combiners.get(operation).ok_or_else(|| GraphError::UnknownOperation {
                    node: self.name(node),
                    operation: operation.clone(),
                })?;
                if let Some(accepted) = combiner.parameters() {
                    args.expect_keys(accepted)?;
                }
                let name = self.registry.name(node);
                let mut ctx = CombineContext::new(name, self.nsim, rng, self.samplers);
                combiner.combine(&mut ctx, &args)?
            }
            NodeKind::Decision { .. } => {
                return Err(GraphError::UnsupportedRole { name: self.name(node), role: Role::Decision.to_string() })
            }
        };
        Ok(value)
    }

    fn name(&self, node: NodeId) -> String {
        self.registry.name(node).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::Parameters;
    use crate::store::NodeMetadata;
    use rand::SeedableRng;

    struct Fixture {
        registry: Registry,
        samplers: SamplerRegistry,
        combiners: CombinerRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                registry: Registry::new(),
                samplers: SamplerRegistry::with_builtins(),
                combiners: CombinerRegistry::with_builtins(),
            }
        }

        fn node(&mut self, name: &str, kind: NodeKind, parents: &[&str]) -> NodeId {
            let id = self.registry.declare(kind, NodeMetadata::new(name, "")).unwrap();
            for p in parents {
                let src = self.registry.slot(p);
                self.registry.add_edge(src, id, None);
            }
            id
        }

        fn run(&self, targets: &[NodeId]) -> Result<Vec<Value>> {
            let engine = Engine::new(&self.registry, &self.samplers, &self.combiners, 5);
            let mut ledger = Ledger::new();
            let mut rng = StdRng::seed_from_u64(7);
            engine.run(targets, &mut ledger, &mut rng)
        }
    }

    fn add() -> NodeKind { NodeKind::Operation { operation: "add".into() } }

    #[test]
    fn test_diamond_shares_random_sample() {
        let mut fx = Fixture::new();
        let params = Parameters::from([("low", 0.0), ("high", 1.0)]);
        fx.node("r", NodeKind::Random { distribution: "uniform".into(), parameters: params }, &[]);
        fx.node("left", NodeKind::Operation { operation: "negate".into() }, &["r"]);
        fx.node("right", NodeKind::Operation { operation: "negate".into() }, &["r"]);
        let sum = fx.node("sum", add(), &["left", "right"]);

        // -r + -r == -2r only if both branches saw the same draw.
        let out = fx.run(&[sum]).unwrap().remove(0);
        let r = fx.run(&[fx.registry.resolve("r").unwrap()]).unwrap().remove(0);
        for i in 0..5 {
            assert!((out.get_at(i) + 2.0 * r.get_at(i)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cycle_reported_not_recursed() {
        let mut fx = Fixture::new();
        let a = fx.node("a", add(), &["b"]);
        fx.node("b", add(), &["a"]);
        assert_eq!(fx.run(&[a]).unwrap_err(), GraphError::CyclicGraph { node: "a".into() });
    }

    #[test]
    fn test_undeclared_predecessor_is_unknown() {
        let mut fx = Fixture::new();
        let a = fx.node("a", add(), &["ghost"]);
        assert_eq!(fx.run(&[a]).unwrap_err(), GraphError::UnknownNode { name: "ghost".into() });
    }

    #[test]
    fn test_unknown_distribution_and_operation() {
        let mut fx = Fixture::new();
        let r = fx.node("r", NodeKind::Random { distribution: "zipf".into(), parameters: Parameters::new() }, &[]);
        let o = fx.node("o", NodeKind::Operation { operation: "frobnicate".into() }, &[]);
        assert!(matches!(fx.run(&[r]), Err(GraphError::UnknownDistribution { .. })));
        assert!(matches!(fx.run(&[o]), Err(GraphError::UnknownOperation { .. })));
    }

    #[test]
    fn test_decision_is_not_evaluable() {
        let mut fx = Fixture::new();
        fx.node("x", NodeKind::Input(Value::Scalar(1.0)), &[]);
        let d = fx.node("d", NodeKind::Decision { condition: "x > 0".into(), parameters: Parameters::new() }, &["x"]);
        assert!(matches!(fx.run(&[d]), Err(GraphError::UnsupportedRole { .. })));
    }
}
