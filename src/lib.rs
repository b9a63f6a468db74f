/// matchday — League tables, player search and local favorites
///
/// Shared setup for the binaries: environment config, tracing, and wiring
/// of the data resolver and the favorites store.

pub mod config;

pub use config::{AppConfig, Provider};

use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` if set, `info` otherwise.
pub fn init_tracing() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();
}
