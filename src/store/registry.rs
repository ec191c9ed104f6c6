use super::types::*;
use crate::error::{GraphError, Result};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node arena. Columnar per-node arrays, incoming edges stored on the
/// successor, outgoing edges as an intrusive linked list.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    // Columnar Arrays
    pub kinds: Vec<NodeKind>,
    pub meta: Vec<NodeMetadata>,

    // Topology: incoming edges in declaration order (argument order).
    pub parents: Vec<SmallVec<[Edge; 4]>>,

    // Downstream traversal helpers
    pub first_child: Vec<u32>,
    pub child_targets: Vec<NodeId>,
    pub next_child: Vec<u32>,

    names: HashMap<String, NodeId>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }
    pub fn count(&self) -> usize { self.kinds.len() }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Resolves a declared node. Reserved-but-undeclared slots count as unknown.
    pub fn resolve(&self, name: &str) -> Result<NodeId> {
        match self.lookup(name) {
            Some(id) if !matches!(self.kinds[id.index()], NodeKind::Undeclared) => Ok(id),
            _ => Err(GraphError::UnknownNode { name: name.to_string() }),
        }
    }

    /// Returns the slot for `name`, reserving an undeclared one if needed.
    pub fn slot(&mut self, name: &str) -> NodeId {
        if let Some(id) = self.lookup(name) {
            return id;
        }
        self.push(NodeKind::Undeclared, NodeMetadata::new(name, ""))
    }

    /// Declares a node, filling a reserved slot when one exists.
    pub fn declare(&mut self, kind: NodeKind, meta: NodeMetadata) -> Result<NodeId> {
        match self.lookup(&meta.name) {
            Some(id) if matches!(self.kinds[id.index()], NodeKind::Undeclared) => {
                self.kinds[id.index()] = kind;
                self.meta[id.index()] = meta;
                Ok(id)
            }
            Some(_) => Err(GraphError::DuplicateNode { name: meta.name }),
            None => Ok(self.push(kind, meta)),
        }
    }

    fn push(&mut self, kind: NodeKind, meta: NodeMetadata) -> NodeId {
        let id = NodeId::new(self.kinds.len());
        self.names.insert(meta.name.clone(), id);
        self.kinds.push(kind);
        self.meta.push(meta);
        self.parents.push(SmallVec::new());
        self.first_child.push(u32::MAX);
        id
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId, param: Option<String>) {
        // 1. Incoming side (argument order)
        self.parents[target.index()].push(Edge { source, param });

        // 2. Outgoing side (linked list prepend)
        let head = self.first_child[source.index()];
        let new_edge = self.child_targets.len() as u32;
        self.child_targets.push(target);
        self.next_child.push(head);
        self.first_child[source.index()] = new_edge;
    }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> &[Edge] {
        &self.parents[id.index()]
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children { registry: self, edge: self.first_child[id.index()] }
    }

    pub fn in_degree(&self, id: NodeId) -> usize { self.parents[id.index()].len() }

    pub fn out_degree(&self, id: NodeId) -> usize { self.children(id).count() }

    #[inline(always)]
    pub fn name(&self, id: NodeId) -> &str { &self.meta[id.index()].name }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.count()).map(NodeId::new)
    }
}

/// Walks a node's outgoing edges, most recently added first.
pub struct Children<'a> {
    registry: &'a Registry,
    edge: u32,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.edge == u32::MAX {
            return None;
        }
        let child = self.registry.child_targets[self.edge as usize];
        self.edge = self.registry.next_child[self.edge as usize];
        Some(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Value;

    fn input(v: f64) -> NodeKind { NodeKind::Input(Value::Scalar(v)) }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut reg = Registry::new();
        reg.declare(input(1.0), NodeMetadata::new("a", "")).unwrap();
        let err = reg.declare(input(2.0), NodeMetadata::new("a", "")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode { name: "a".into() });
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn test_forward_reference_filled_by_declaration() {
        let mut reg = Registry::new();
        let op = reg.declare(NodeKind::Operation { operation: "add".into() }, NodeMetadata::new("sum", "")).unwrap();
        let later = reg.slot("x");
        reg.add_edge(later, op, None);
        assert!(reg.resolve("x").is_err());

        let declared = reg.declare(input(3.0), NodeMetadata::new("x", "the x")).unwrap();
        assert_eq!(declared, later);
        assert_eq!(reg.resolve("x").unwrap(), later);
        assert_eq!(reg.meta[later.index()].description, "the x");
    }

    #[test]
    fn test_edges_visible_from_both_ends() {
        let mut reg = Registry::new();
        let a = reg.declare(input(1.0), NodeMetadata::new("a", "")).unwrap();
        let b = reg.declare(NodeKind::Operation { operation: "f".into() }, NodeMetadata::new("b", "")).unwrap();
        let c = reg.declare(NodeKind::Goal { operation: "g".into() }, NodeMetadata::new("c", "")).unwrap();
        reg.add_edge(a, b, None);
        reg.add_edge(a, c, Some("lhs".into()));
        reg.add_edge(b, c, Some("rhs".into()));

        let kids: Vec<_> = reg.children(a).collect();
        assert_eq!(kids, vec![c, b]);
        assert_eq!(reg.in_degree(c), 2);
        assert_eq!(reg.out_degree(c), 0);
        assert_eq!(reg.get_parents(c)[1].param.as_deref(), Some("rhs"));
    }
}
