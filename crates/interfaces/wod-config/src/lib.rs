//! Central configuration constants for runtime limits and defaults.

/// Environment variable naming the HTTP catalog endpoint.
pub const REMOTE_URL_ENV: &str = "WOD_REMOTE_URL";

/// Environment variable naming the redb catalog file.
pub const DB_PATH_ENV: &str = "WOD_DB_PATH";

/// Default timeout for a single remote request, in seconds.
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

/// Minimum allowed remote timeout, in seconds.
pub const MIN_REMOTE_TIMEOUT_SECS: u64 = 1;

/// Maximum allowed remote timeout, in seconds.
pub const MAX_REMOTE_TIMEOUT_SECS: u64 = 120;

/// Capacity of the mirror outcome channel. Outcomes beyond this are dropped
/// (and still logged).
pub const MIRROR_OUTCOME_CAPACITY: usize = 256;

/// Path segment of the event collection on the HTTP catalog.
pub const REMOTE_EVENTS_PATH: &str = "events";

/// Convenience function to clamp a timeout value into allowed range.
pub fn clamp_timeout_secs(v: u64) -> u64 {
    v.clamp(MIN_REMOTE_TIMEOUT_SECS, MAX_REMOTE_TIMEOUT_SECS)
}
