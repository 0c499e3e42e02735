//! Tracing and logging setup shared by both services.

/// Initialize process-wide tracing for `service`.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init(service: &'static str) {
    tracing::init(service);
}

/// Tracing configuration (filters, formatters).
pub mod tracing;
