use crate::error::{GraphError, Result};
use crate::store::{NodeId, NodeKind, Registry};
use petgraph::algo::is_cyclic_directed;
use petgraph::dot::Dot;
use petgraph::graph::DiGraph;
use std::collections::{HashSet, VecDeque};

/// Performs a Topological Sort using Depth-First Search (DFS).
///
/// Returns a list of NodeIds where every dependency appears before its consumer.
/// Undeclared placeholder slots are included, so the order covers every edge.
pub fn sort(registry: &Registry) -> Result<Vec<NodeId>> {
    let count = registry.count();
    let mut order = Vec::with_capacity(count);
    let mut state = vec![VisitState::None; count];

    // Edges are stored on the consumer (Child -> Parent), so post-order gives [Parent, ..., Child].
    for id in registry.ids() {
        if state[id.index()] == VisitState::None {
            visit(id, registry, &mut state, &mut order)?;
        }
    }

    Ok(order)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}

fn visit(
    node: NodeId,
    registry: &Registry,
    state: &mut Vec<VisitState>,
    order: &mut Vec<NodeId>,
) -> Result<()> {
    let idx = node.index();

    match state[idx] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            return Err(GraphError::CyclicGraph { node: registry.name(node).to_string() })
        }
        VisitState::None => state[idx] = VisitState::Visiting,
    }

    for edge in registry.get_parents(node) {
        visit(edge.source, registry, state, order)?;
    }

    state[idx] = VisitState::Visited;
    order.push(node);
    Ok(())
}

/// Identifies all nodes downstream from the given start nodes (inclusive).
/// Used for invalidation after a reseed.
pub fn downstream_from(registry: &Registry, start_nodes: &[NodeId]) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from(start_nodes.to_vec());

    while let Some(node) = queue.pop_front() {
        if visited.insert(node) {
            queue.extend(registry.children(node));
        }
    }
    visited
}

/// Identifies all nodes upstream from the given start nodes (inclusive).
pub fn upstream_from(registry: &Registry, start_nodes: &[NodeId]) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from(start_nodes.to_vec());

    while let Some(node) = queue.pop_front() {
        if visited.insert(node) {
            queue.extend(registry.get_parents(node).iter().map(|e| e.source));
        }
    }
    visited
}

/// Copies the arena into a `petgraph` graph. Node weights read `name (role)`,
/// edge weights carry the bound parameter name or an empty string.
pub fn to_petgraph(registry: &Registry) -> DiGraph<String, String> {
    let mut graph = DiGraph::with_capacity(registry.count(), registry.child_targets.len());
    let indices: Vec<_> = registry
        .ids()
        .map(|id| {
            let role = match registry.kinds[id.index()].role() {
                Some(role) => role.to_string(),
                None => "undeclared".to_string(),
            };
            graph.add_node(format!("{} ({})", registry.name(id), role))
        })
        .collect();

    for target in registry.ids() {
        for edge in registry.get_parents(target) {
            let label = edge.param.clone().unwrap_or_default();
            graph.add_edge(indices[edge.source.index()], indices[target.index()], label);
        }
    }
    graph
}

pub fn is_acyclic(registry: &Registry) -> bool {
    !is_cyclic_directed(&to_petgraph(registry))
}

/// Graphviz rendering of the whole graph.
pub fn to_dot(registry: &Registry) -> String {
    format!("{}", Dot::new(&to_petgraph(registry)))
}

/// Names of slots referenced by edges but never declared.
pub fn undeclared(registry: &Registry) -> Vec<NodeId> {
    registry.ids().filter(|id| matches!(registry.kinds[id.index()], NodeKind::Undeclared)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Value;
    use crate::store::NodeMetadata;

    fn op(reg: &mut Registry, name: &str, parents: &[NodeId]) -> NodeId {
        let id = reg.declare(NodeKind::Operation { operation: "add".into() }, NodeMetadata::new(name, "")).unwrap();
        for &p in parents {
            reg.add_edge(p, id, None);
        }
        id
    }

    #[test]
    fn test_sort_diamond_dependency() {
        // Shape: A -> B, A -> C, B+C -> D
        let mut reg = Registry::new();
        let a = reg.declare(NodeKind::Input(Value::Scalar(1.0)), NodeMetadata::new("A", "")).unwrap();
        let b = op(&mut reg, "B", &[a]);
        let c = op(&mut reg, "C", &[a]);
        let d = op(&mut reg, "D", &[b, c]);

        let res = sort(&reg).expect("Sort failed");

        let pos = |id: NodeId| res.iter().position(|&x| x == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(a) < pos(c));
        assert!(pos(b) < pos(d));
        assert!(pos(c) < pos(d));
        assert!(is_acyclic(&reg));

        assert_eq!(downstream_from(&reg, &[b]), HashSet::from([b, d]));
        assert_eq!(upstream_from(&reg, &[b]), HashSet::from([a, b]));
    }

    #[test]
    fn test_cycle_detection_explicit() {
        let mut reg = Registry::new();
        let a = op(&mut reg, "A", &[]);
        let b = op(&mut reg, "B", &[a]);
        reg.add_edge(b, a, None);

        let err = sort(&reg).unwrap_err();
        assert!(matches!(err, GraphError::CyclicGraph { .. }), "{:?}", err);
        assert!(!is_acyclic(&reg));
    }

    #[test]
    fn test_dot_labels_params() {
        let mut reg = Registry::new();
        let a = reg.declare(NodeKind::Input(Value::Scalar(1.0)), NodeMetadata::new("a", "")).unwrap();
        let b = op(&mut reg, "b", &[]);
        reg.add_edge(a, b, Some("lhs".into()));
        let pending = reg.slot("later");
        reg.add_edge(pending, b, None);

        let dot = to_dot(&reg);
        assert!(dot.contains("a (input)"));
        assert!(dot.contains("lhs"));
        assert!(dot.contains("later (undeclared)"));
        assert_eq!(undeclared(&reg), vec![pending]);
    }
}
