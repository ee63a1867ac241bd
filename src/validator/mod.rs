//! RFC-shape syntax validation (practical subset).
//!
//! The check is deliberately forgiving about *how* it fails: malformed input
//! yields `ok = false` with reasons, never an error, because uploaded list
//! content is untrusted.

mod domain;
mod local;
mod types;

pub use types::SyntaxReport;

use std::sync::OnceLock;

use regex::Regex;

use domain::check_domain;
use local::check_local;

/// Practical RFC-5322-derived pattern applied to the ASCII form of an
/// address: atext local part, dotted alphanumeric-with-hyphen labels, an
/// alphabetic TLD of at least two letters.
fn address_shape() -> &'static Regex {
    static ADDRESS_SHAPE: OnceLock<Regex> = OnceLock::new();
    ADDRESS_SHAPE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]{1,64}@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("address pattern compiles")
    })
}

/// Check one normalized address. Never panics on malformed input.
pub fn check_syntax(email: &str) -> SyntaxReport {
    let input = email.trim();

    let Some((local, domain)) = input.rsplit_once('@') else {
        return SyntaxReport::failed("must contain exactly one '@'");
    };

    let mut reasons = Vec::new();

    if input.len() > 254 {
        reasons.push(format!("total length {} > 254", input.len()));
    }

    let local_ok = check_local(local, &mut reasons);
    let (domain_ok, ascii_domain) = check_domain(domain, &mut reasons);

    // second opinion over the ASCII form; the label checks above give the
    // precise reasons, the pattern is the coarse gate
    if local_ok && domain_ok {
        if let Some(ascii) = ascii_domain {
            let candidate = format!("{local}@{ascii}");
            if !address_shape().is_match(&candidate) {
                reasons.push("does not match the practical address pattern".to_string());
            }
        }
    }

    SyntaxReport {
        ok: reasons.is_empty(),
        local_ok,
        domain_ok,
        reasons,
    }
}

/// Convenience wrapper for callers that only need the verdict.
pub fn is_syntax_valid(email: &str) -> bool {
    check_syntax(email).ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_basic() {
        let r = check_syntax("alice@example.com");
        assert!(r.ok, "{:?}", r.reasons);
    }

    #[test]
    fn accepts_short_labels() {
        assert!(is_syntax_valid("a@a.com"));
    }

    #[test]
    fn rejects_missing_at() {
        let r = check_syntax("bad");
        assert!(!r.ok);
        assert!(!r.local_ok);
        assert!(!r.domain_ok);
    }

    #[test]
    fn rejects_double_at_via_local() {
        let r = check_syntax("a@b@example.com");
        assert!(!r.ok);
        assert!(!r.local_ok);
        assert!(r.domain_ok, "{:?}", r.reasons);
    }

    #[test]
    fn domain_level_failure_is_visible() {
        let r = check_syntax("user@gmail,com");
        assert!(!r.ok);
        assert!(r.local_ok);
        assert!(!r.domain_ok);
    }

    #[test]
    fn rejects_consecutive_dots_in_local() {
        assert!(!is_syntax_valid("a..b@example.com"));
    }

    #[test]
    fn rejects_one_letter_tld() {
        assert!(!is_syntax_valid("user@example.c"));
    }

    #[test]
    fn rejects_overlong_address() {
        let local = "a".repeat(64);
        let label = "b".repeat(63);
        let addr = format!("{local}@{label}.{label}.{label}.com");
        assert!(!is_syntax_valid(&addr));
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(input in ".*") {
            let _ = check_syntax(&input);
        }

        #[test]
        fn simple_ascii_addresses_pass(input in "[a-z][a-z0-9]{0,9}@[a-z]{1,10}\\.[a-z]{2,5}") {
            let report = check_syntax(&input);
            prop_assert!(report.ok, "{:?}", report.reasons);
        }
    }
}
