//! Timeout helpers used across the crate.
//!
//! The mechanical and exchange budgets themselves live in `constants`; this
//! module only provides the millisecond conversion helper and the default
//! read timeout used by channels when a caller does not supply one.

use std::time::Duration;

/// Default read timeout in milliseconds used by channels when a caller
/// doesn't provide an explicit timeout.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// Convenience: default read timeout as Duration.
pub fn default_read_timeout() -> Duration {
    ms(DEFAULT_READ_TIMEOUT_MS)
}
