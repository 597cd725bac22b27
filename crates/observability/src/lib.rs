//! Tracing/logging setup shared by the client library and its binaries.

/// Initialize process-wide structured (JSON) logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::Format::Json);
}

/// Initialize human-readable logging (interactive CLI use).
pub fn init_pretty() {
    tracing::init(tracing::Format::Pretty);
}

/// Tracing configuration (filters, formats).
pub mod tracing;
