//! Cleaning helpers for raw email values.
//!
//! Normalization strips surrounding whitespace and interior spaces, splits
//! on the last `@` and lowercases the domain segment. Local-part case is
//! preserved in exported values; duplicate detection uses the fully
//! lowercased address.

/// Normalize a single raw value: trim, then drop interior spaces.
///
/// Returns an empty string for blank input; never fails.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != ' ').collect()
}

/// Split a normalized address into local part and lowercased domain.
///
/// Splits on the *last* `@`; a value without `@` keeps everything in the
/// local slot and yields an empty domain.
pub fn split_local_domain(email: &str) -> (&str, String) {
    match email.rsplit_once('@') {
        Some((local, domain)) => (local, domain.to_lowercase()),
        None => (email, String::new()),
    }
}

/// Case-insensitive canonical form used for deduplication and suppression
/// matching.
pub fn canonical_key(normalized: &str) -> String {
    normalized.to_lowercase()
}
