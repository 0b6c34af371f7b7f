// src/telemetry.rs
// =============================================================================
// Logging setup.
//
// Log lines go to stderr so `--json` output on stdout stays clean.
// The level comes from RUST_LOG (e.g. RUST_LOG=debug), defaulting to info.
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
