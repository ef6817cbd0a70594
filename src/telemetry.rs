//! Structured logging for receiving services and tools

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset: this crate at info, dependencies at warn
pub const DEFAULT_FILTER: &str = "warn,receiving_core=info";

/// Filter from `RUST_LOG`, falling back to `default_directive`
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the JSON subscriber with [`DEFAULT_FILTER`].
///
/// Repeated calls are no-ops.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Install the JSON subscriber with a caller-chosen fallback directive, e.g. `receiving_core=debug`
pub fn init_with_default(default_directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_default("receiving_core=debug");
        init();
        tracing::info!(po_number = "PO-1", "logging initialised");
    }
}
