//! Evaluates the scenario graph.
pub mod engine;
pub mod kernel;
pub mod ledger;
pub mod value;

pub use engine::Engine;
pub use ledger::Ledger;
pub use value::Value;
