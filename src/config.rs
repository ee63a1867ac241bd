//! Central configuration defaults shared by the library and the CLI.
//!
//! Keeping these values in one place keeps the CLI flags, docs and core code
//! in sync. The defaults favour medium-sized lists on free-hosted
//! environments.

use std::time::Duration;

/// Per-domain DNS MX query timeout.
pub const DNS_TIMEOUT: Duration = Duration::from_secs(2);

/// Wall-time budget for the whole MX stage; unresolved domains past this
/// point are classified `mx_unknown`.
pub const MX_DEADLINE: Duration = Duration::from_secs(30);

/// Maximum number of worker threads for parallel MX lookups.
pub const MAX_MX_WORKERS: usize = 64;

/// Base edit-distance threshold for domain suggestions.
pub const TYPO_DISTANCE_THRESHOLD: usize = 2;

/// Tunables consumed by [`clean_list`](crate::pipeline::clean_list).
///
/// Supplied by the caller; the core never reads the environment directly.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Fix or flag borderline rows instead of rejecting them.
    pub safe_mode: bool,
    /// Verify that recipient domains have mail servers (needs `with-mx`).
    pub enable_mx_check: bool,
    /// Per-domain DNS query timeout.
    pub mx_timeout: Duration,
    /// Wall-time budget for the whole MX stage.
    pub mx_deadline: Duration,
    /// Worker pool size for MX lookups.
    pub max_concurrent_mx_lookups: usize,
    /// Maximum accepted edit distance for a domain suggestion.
    pub typo_distance_threshold: usize,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            safe_mode: true,
            enable_mx_check: false,
            mx_timeout: DNS_TIMEOUT,
            mx_deadline: MX_DEADLINE,
            max_concurrent_mx_lookups: MAX_MX_WORKERS,
            typo_distance_threshold: TYPO_DISTANCE_THRESHOLD,
        }
    }
}
