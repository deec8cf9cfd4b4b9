//! Tracing/logging initialization for binaries and tests that embed the engine.
//!
//! The library itself only emits `tracing` events; installing a subscriber is
//! the host's choice.

use tracing_subscriber::EnvFilter;

/// Installs a formatted subscriber filtered by `RUST_LOG`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every computed breakdown
/// - `RUST_LOG=invoice_core=trace` - Trace the engine only
/// - Default: INFO, with DEBUG for invoice_core
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,invoice_core=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::debug!("still logging after a second init");
    }
}
