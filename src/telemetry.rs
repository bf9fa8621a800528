// src/telemetry.rs
// =============================================================================
// Diagnostic logging.
//
// Diagnostics go to stderr through `tracing`, separate from the run log file
// and from the report on stdout. RUST_LOG overrides the default level.
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "sitemap_checker=debug,warn"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
