//! Tracing subscriber setup for the command line and embedding hosts.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `riskgraph_core=debug`.
pub const LOG_ENV: &str = "RISKGRAPH_LOG";

/// Installs a global `fmt` subscriber writing to stderr.
///
/// The filter comes from `RISKGRAPH_LOG` and falls back to
/// `riskgraph_core=info`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("riskgraph_core=info"));

        // A host may have installed its own subscriber already.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .try_init();
    });
}
