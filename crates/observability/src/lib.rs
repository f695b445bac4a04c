//! Tracing and logging setup shared by the gateway binaries and tests.

/// Initialize process-wide logging in the given output format.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init(format: LogFormat) {
    self::tracing::init(format);
}

pub use self::tracing::LogFormat;

/// Subscriber configuration (filters, formatting).
pub mod tracing;
