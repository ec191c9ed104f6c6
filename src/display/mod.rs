//! Text renderings for terminals and the reporting layer.
pub mod summary;
pub mod trace;

pub use summary::format_stats;
pub use trace::format_trace;
