//! Read-only analyses over the arena and evaluated values.
pub mod distribution;
pub mod stats;
pub mod topology;

pub use distribution::Chart;
pub use stats::Stats;
