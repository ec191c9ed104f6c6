//! trace.rs
//! Dependency-tree rendering of a node and its ancestors.

use crate::compute::{Ledger, Value};
use crate::store::{NodeId, NodeKind, Registry};
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the dependency tree of `target` with the values stored by the latest pass.
pub fn format_trace(registry: &Registry, ledger: &Ledger, target: NodeId) -> String {
    let mut tracer = Tracer {
        registry,
        ledger,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    if target.index() < registry.count() {
        let name = registry.name(target);
        let _ = writeln!(tracer.output, "EVALUATION TRACE for node '{}':", name);
        let _ = writeln!(tracer.output, "--------------------------------------------------");
        tracer.trace_node(target, 1, "", None);
    } else {
        let _ = writeln!(tracer.output, "Error: Invalid Node ID {:?}", target);
    }
    tracer.output
}

struct Tracer<'a> {
    registry: &'a Registry,
    ledger: &'a Ledger,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str, param: Option<&str>) {
        let name = self.registry.name(node_id);
        let binding = match param {
            Some(p) => format!(" as {}", p),
            None => String::new(),
        };

        // Shared ancestors are printed once.
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}{}{} -> (Ref to L{})", prefix, name, binding, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let origin = match &self.registry.kinds[node_id.index()] {
            NodeKind::Undeclared => "undeclared".to_string(),
            NodeKind::Input(_) => "input".to_string(),
            NodeKind::Random { distribution, .. } => format!("random ~ {}", distribution),
            NodeKind::Operation { operation } => format!("operation {}", operation),
            NodeKind::Goal { operation } => format!("goal {}", operation),
            NodeKind::Decision { condition, .. } => format!("decision if {}", condition),
        };
        let value = self.format_value(node_id);
        let _ = writeln!(self.output, "{}[L{}] {}{} ({}) {}", prefix, level, name, binding, origin, value);

        let parents = self.registry.get_parents(node_id).to_vec();
        let stem = self.build_child_stem(prefix);
        for (i, edge) in parents.iter().enumerate() {
            let connector = if i == parents.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(edge.source, level + 1, &full_prefix, edge.param.as_deref());
        }
    }

    fn format_value(&self, id: NodeId) -> String {
        let stored = self.ledger.get(id).or(match &self.registry.kinds[id.index()] {
            NodeKind::Input(v) => Some(v),
            _ => None,
        });
        match stored {
            Some(Value::Scalar(s)) => format!("[{:.3}]", s),
            Some(Value::Series(vec)) if vec.len() == 1 => format!("[{:.3}]", vec[0]),
            Some(Value::Series(vec)) => {
                let mean = vec.iter().sum::<f64>() / vec.len() as f64;
                format!("[mean={:.3}, n={}]", mean, vec.len())
            }
            Some(Value::Record(fields)) => {
                let body: Vec<String> = fields.iter().map(|(k, v)| format!("{}={:.3}", k, v)).collect();
                format!("{{{}}}", body.join(", "))
            }
            None => "[?]".to_string(),
        }
    }

    fn build_child_stem(&self, current_prefix: &str) -> String {
        current_prefix.replace("`--", "   ").replace("|--", "|  ")
    }
}

#[cfg(test)]
mod tests {
    use crate::scenario::{Incoming, ScenarioGraph};

    #[test]
    fn test_trace_marks_shared_nodes_and_bindings() {
        let mut g = ScenarioGraph::default();
        g.add_input("a", 2.0, "").unwrap();
        g.add_operation("double", "add", ["a", "b"], "").unwrap();
        g.add_input("b", 2.0, "").unwrap();
        g.add_goal("total", "add", Incoming::named([("double", "x"), ("a", "y")]), "").unwrap();
        g.eval("total").unwrap();

        let out = g.trace("total").unwrap();
        assert!(out.starts_with("EVALUATION TRACE for node 'total':"));
        assert!(out.contains("[L1] total (goal add) [6.000]"));
        assert!(out.contains("double as x (operation add) [4.000]"));
        assert!(out.contains("a as y -> (Ref to L3)"));
    }

    #[test]
    fn test_unevaluated_values_render_as_unknown() {
        let mut g = ScenarioGraph::default();
        g.add_random("r", "uniform", [("low", 0.0), ("high", 1.0)], "").unwrap();
        let out = g.trace("r").unwrap();
        assert!(out.contains("r (random ~ uniform) [?]"));
    }
}
