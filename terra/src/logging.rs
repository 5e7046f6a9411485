//! Tracing subscriber setup (§10.2), installed once at startup. Library
//! crates (`terra-core`, `terra-registry`) only emit `tracing` events; this
//! binary crate is the sole place a subscriber gets installed, keeping
//! emission and presentation separate.

use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber with ANSI output, honoring `RUST_LOG` and
/// defaulting to `info` when unset.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_target(true)
        .init();
}
