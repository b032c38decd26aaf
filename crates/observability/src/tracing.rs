//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Emits JSON logs by default, filtered via `RUST_LOG` (default `info`).
/// Setting `LOG_FORMAT=plain` switches to a human-readable format for local
/// runs. Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let plain = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("plain"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    if plain {
        let _ = builder.try_init();
    } else {
        let _ = builder.json().try_init();
    }
}
