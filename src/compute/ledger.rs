//! ledger.rs
//! Dense per-node storage of evaluated values and their statistics.

use super::value::Value;
use crate::analysis::stats::Stats;
use crate::store::NodeId;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    values: Vec<Option<Value>>,
    stats: Vec<Option<Stats>>,
}

impl Ledger {
    pub fn new() -> Self { Self::default() }

    pub fn ensure_capacity(&mut self, size: usize) {
        if self.values.len() < size {
            self.values.resize(size, None);
            self.stats.resize(size, None);
        }
    }

    #[inline(always)]
    pub fn get(&self, node_id: NodeId) -> Option<&Value> {
        self.values.get(node_id.index())?.as_ref()
    }

    /// Stores a freshly evaluated value. Stats computed from the previous value are dropped.
    pub fn insert(&mut self, node_id: NodeId, value: Value) {
        self.ensure_capacity(node_id.index() + 1);
        self.values[node_id.index()] = Some(value);
        self.stats[node_id.index()] = None;
    }

    pub fn get_stats(&self, node_id: NodeId) -> Option<&Stats> {
        self.stats.get(node_id.index())?.as_ref()
    }

    pub fn insert_stats(&mut self, node_id: NodeId, stats: Stats) {
        self.ensure_capacity(node_id.index() + 1);
        self.stats[node_id.index()] = Some(stats);
    }

    /// Clears values and stats. Returns how many stored values were dropped.
    pub fn invalidate(&mut self, node_ids: impl IntoIterator<Item = NodeId>) -> usize {
        let mut dropped = 0;
        for id in node_ids {
            if let Some(slot) = self.values.get_mut(id.index()) {
                if slot.take().is_some() {
                    dropped += 1;
                }
                self.stats[id.index()] = None;
            }
        }
        dropped
    }
}
