//! graph.rs
//! The scenario graph: declarations, evaluation passes and statistics.

use super::incoming::Incoming;
use crate::analysis::{stats::Stats, topology, Chart};
use crate::combine::CombinerRegistry;
use crate::compute::{Engine, Ledger, Value};
use crate::config::ScenarioConfig;
use crate::display::trace;
use crate::error::{GraphError, Result};
use crate::sampling::{Parameters, SamplerRegistry};
use crate::store::{GraphType, NodeId, NodeKind, NodeMetadata, Registry, Role};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, trace};

/// A Monte Carlo risk model.
///
/// Nodes are declared once through the typed `add_*` constructors and
/// evaluated on demand. Every call to [`ScenarioGraph::eval`] or
/// [`ScenarioGraph::eval_many`] is a new evaluation pass: random ancestors are
/// resampled, and within the pass each node is evaluated at most once. Values
/// from the latest pass stay readable through [`ScenarioGraph::value`]; a
/// stored value whose ancestors were re-evaluated without it is dropped.
#[derive(Debug, Clone)]
pub struct ScenarioGraph {
    registry: Registry,
    ledger: Ledger,
    config: ScenarioConfig,
    rng: StdRng,
    samplers: SamplerRegistry,
    combiners: CombinerRegistry,
}

/// Read-only view of a declared node.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    pub id: NodeId,
    pub name: &'a str,
    pub role: Role,
    pub description: &'a str,
    pub graph_type: GraphType,
    pub kind: &'a NodeKind,
}

impl Default for ScenarioGraph {
    fn default() -> Self {
        Self::build(ScenarioConfig::default(), SamplerRegistry::with_builtins(), CombinerRegistry::with_builtins())
    }
}

impl ScenarioGraph {
    /// A graph using the built-in samplers and combiners.
    pub fn new(config: ScenarioConfig) -> Result<Self> {
        Self::with_registries(config, SamplerRegistry::with_builtins(), CombinerRegistry::with_builtins())
    }

    pub fn with_registries(
        config: ScenarioConfig,
        samplers: SamplerRegistry,
        combiners: CombinerRegistry,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, samplers, combiners))
    }

    fn build(config: ScenarioConfig, samplers: SamplerRegistry, combiners: CombinerRegistry) -> Self {
        Self {
            registry: Registry::new(),
            ledger: Ledger::new(),
            rng: StdRng::seed_from_u64(config.seed),
            config,
            samplers,
            combiners,
        }
    }

    pub fn seed(&self) -> u64 { self.config.seed }
    pub fn nsim(&self) -> usize { self.config.nsim }
    pub fn config(&self) -> &ScenarioConfig { &self.config }

    /// Restarts the random stream from `seed` and drops the stored values of
    /// random nodes and everything downstream of them.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);

        let random: Vec<NodeId> = self.ids_with_role(Role::Random).collect();
        let dirty = topology::downstream_from(&self.registry, &random);
        let dropped = self.ledger.invalidate(dirty);
        info!(seed, dropped, "random stream reseeded");
    }

    pub fn samplers(&self) -> &SamplerRegistry { &self.samplers }
    pub fn samplers_mut(&mut self) -> &mut SamplerRegistry { &mut self.samplers }
    pub fn combiners(&self) -> &CombinerRegistry { &self.combiners }
    pub fn combiners_mut(&mut self) -> &mut CombinerRegistry { &mut self.combiners }

    // --- Declarations ---

    fn declare(&mut self, kind: NodeKind, name: &str, description: &str, incoming: &Incoming) -> Result<NodeId> {
        let role = kind.role();
        let id = self.registry.declare(kind, NodeMetadata::new(name, description))?;
        for (pred, param) in incoming.edges() {
            let source = self.registry.slot(pred);
            self.registry.add_edge(source, id, param.map(str::to_string));
        }
        trace!(node = name, ?role, inputs = incoming.edges().len(), "declared");
        Ok(id)
    }

    /// A node returning `value` whenever it is evaluated.
    pub fn add_input(&mut self, name: &str, value: impl Into<Value>, description: &str) -> Result<NodeId> {
        self.declare(NodeKind::Input(value.into()), name, description, &Incoming::none())
    }

    /// A node drawing `nsim` samples from `distribution` on every pass.
    /// The distribution name is only resolved at evaluation time.
    pub fn add_random(
        &mut self,
        name: &str,
        distribution: &str,
        parameters: impl Into<Parameters>,
        description: &str,
    ) -> Result<NodeId> {
        let kind = NodeKind::Random { distribution: distribution.to_string(), parameters: parameters.into() };
        self.declare(kind, name, description, &Incoming::none())
    }

    /// A node combining the values of `incoming` with the registered `operation`.
    /// Predecessors may be declared later.
    pub fn add_operation(
        &mut self,
        name: &str,
        operation: &str,
        incoming: impl Into<Incoming>,
        description: &str,
    ) -> Result<NodeId> {
        let kind = NodeKind::Operation { operation: operation.to_string() };
        self.declare(kind, name, description, &incoming.into())
    }

    /// Like [`ScenarioGraph::add_operation`], for a terminal node of interest.
    pub fn add_goal(
        &mut self,
        name: &str,
        operation: &str,
        incoming: impl Into<Incoming>,
        description: &str,
    ) -> Result<NodeId> {
        let kind = NodeKind::Goal { operation: operation.to_string() };
        self.declare(kind, name, description, &incoming.into())
    }

    /// Records a decision point. Decisions have no evaluation semantics yet;
    /// evaluating one fails with `UnsupportedRole`.
    pub fn add_decision(
        &mut self,
        name: &str,
        incoming: impl Into<Incoming>,
        condition: &str,
        parameters: impl Into<Parameters>,
        description: &str,
    ) -> Result<NodeId> {
        let kind = NodeKind::Decision { condition: condition.to_string(), parameters: parameters.into() };
        self.declare(kind, name, description, &incoming.into())
    }

    /// Adds a raw dependency edge, appended to `to`'s argument list.
    pub fn connect(&mut self, from: &str, to: &str, param: Option<&str>) {
        let source = self.registry.slot(from);
        let target = self.registry.slot(to);
        self.registry.add_edge(source, target, param.map(str::to_string));
    }

    pub fn set_graph_type(&mut self, name: &str, graph_type: GraphType) -> Result<()> {
        let id = self.registry.resolve(name)?;
        self.registry.meta[id.index()].graph_type = graph_type;
        Ok(())
    }

    // --- Evaluation ---

    /// Evaluates `name` and all of its ancestors in a new pass.
    pub fn eval(&mut self, name: &str) -> Result<Value> {
        let mut values = self.eval_many(&[name])?;
        Ok(values.swap_remove(0))
    }

    /// Evaluates several nodes in one pass, so shared random ancestors are
    /// sampled once for all of them.
    pub fn eval_many(&mut self, names: &[&str]) -> Result<Vec<Value>> {
        let targets = names.iter().map(|n| self.registry.resolve(n)).collect::<Result<Vec<_>>>()?;
        let engine = Engine::new(&self.registry, &self.samplers, &self.combiners, self.config.nsim);
        engine.run(&targets, &mut self.ledger, &mut self.rng)
    }

    /// The stored value of `name`. Inputs always have one.
    pub fn value(&self, name: &str) -> Result<Option<&Value>> {
        let id = self.registry.resolve(name)?;
        Ok(self.ledger.get(id).or(match &self.registry.kinds[id.index()] {
            NodeKind::Input(value) => Some(value),
            _ => None,
        }))
    }

    /// Computes and attaches summary statistics of the stored value of `name`.
    /// Never triggers evaluation.
    pub fn generate_stats(&mut self, name: &str) -> Result<Stats> {
        let id = self.registry.resolve(name)?;
        let stats = {
            let value = self.value(name)?.ok_or_else(|| GraphError::NotEvaluated { name: name.to_string() })?;
            let samples = value.as_slice().ok_or_else(|| GraphError::NonNumeric { name: name.to_string() })?;
            Stats::from_samples(samples)
        };
        self.ledger.insert_stats(id, stats);
        Ok(stats)
    }

    pub fn stats(&self, name: &str) -> Result<Option<&Stats>> {
        let id = self.registry.resolve(name)?;
        Ok(self.ledger.get_stats(id))
    }

    /// Chart data of the stored value of `name`, shaped by its graph type.
    pub fn chart(&self, name: &str, bins: usize) -> Result<Chart> {
        let graph_type = self.node(name)?.graph_type;
        let value = self.value(name)?.ok_or_else(|| GraphError::NotEvaluated { name: name.to_string() })?;
        let samples = value.as_slice().ok_or_else(|| GraphError::NonNumeric { name: name.to_string() })?;
        Ok(Chart::new(graph_type, samples, bins))
    }

    // --- Validation ---

    /// True iff no input node has an incoming edge.
    pub fn validate_inputs(&self) -> bool {
        self.ids_with_role(Role::Input).all(|id| self.registry.in_degree(id) == 0)
    }

    /// True iff no goal node feeds another node.
    pub fn validate_goals(&self) -> bool {
        self.ids_with_role(Role::Goal).all(|id| self.registry.out_degree(id) == 0)
    }

    /// Every node, undeclared slots included, with dependencies first.
    pub fn topological_order(&self) -> Result<Vec<&str>> {
        Ok(topology::sort(&self.registry)?.into_iter().map(|id| self.registry.name(id)).collect())
    }

    /// `name` and everything it depends on, in slot order.
    pub fn ancestors(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.registry.resolve(name)?;
        let mut ids: Vec<NodeId> = topology::upstream_from(&self.registry, &[id]).into_iter().collect();
        ids.sort_unstable();
        Ok(ids.into_iter().map(|id| self.registry.name(id)).collect())
    }

    pub fn is_acyclic(&self) -> bool {
        topology::is_acyclic(&self.registry)
    }

    /// Names referenced as predecessors but never declared.
    pub fn undeclared_nodes(&self) -> Vec<&str> {
        topology::undeclared(&self.registry).into_iter().map(|id| self.registry.name(id)).collect()
    }

    // --- Inspection ---

    fn ids_with_role(&self, role: Role) -> impl Iterator<Item = NodeId> + '_ {
        self.registry.ids().filter(move |id| self.registry.kinds[id.index()].role() == Some(role))
    }

    pub fn nodes_with_role(&self, role: Role) -> Vec<&str> {
        self.ids_with_role(role).map(|id| self.registry.name(id)).collect()
    }

    pub fn input_nodes(&self) -> Vec<&str> { self.nodes_with_role(Role::Input) }
    pub fn random_nodes(&self) -> Vec<&str> { self.nodes_with_role(Role::Random) }
    pub fn operation_nodes(&self) -> Vec<&str> { self.nodes_with_role(Role::Operation) }
    pub fn goal_nodes(&self) -> Vec<&str> { self.nodes_with_role(Role::Goal) }
    pub fn decision_nodes(&self) -> Vec<&str> { self.nodes_with_role(Role::Decision) }

    /// Declared node names in declaration order of their slots.
    pub fn node_names(&self) -> Vec<&str> {
        self.registry
            .ids()
            .filter(|id| self.registry.kinds[id.index()].role().is_some())
            .map(|id| self.registry.name(id))
            .collect()
    }

    pub fn node(&self, name: &str) -> Result<NodeView<'_>> {
        let id = self.registry.resolve(name)?;
        let meta = &self.registry.meta[id.index()];
        let kind = &self.registry.kinds[id.index()];
        let role = kind.role().ok_or_else(|| GraphError::UnknownNode { name: name.to_string() })?;
        Ok(NodeView {
            id,
            name: &meta.name,
            role,
            description: &meta.description,
            graph_type: meta.graph_type,
            kind,
        })
    }

    /// `(predecessor, explicit argument)` pairs of `name`, in binding order.
    pub fn predecessors(&self, name: &str) -> Result<Vec<(&str, Option<&str>)>> {
        let id = self.registry.resolve(name)?;
        Ok(self
            .registry
            .get_parents(id)
            .iter()
            .map(|e| (self.registry.name(e.source), e.param.as_deref()))
            .collect())
    }

    pub fn registry(&self) -> &Registry { &self.registry }
    pub fn ledger(&self) -> &Ledger { &self.ledger }

    /// Indented dependency tree of `name` with the values of the latest pass.
    pub fn trace(&self, name: &str) -> Result<String> {
        let id = self.registry.resolve(name)?;
        Ok(trace::format_trace(&self.registry, &self.ledger, id))
    }

    pub fn to_dot(&self) -> String {
        topology::to_dot(&self.registry)
    }
}
