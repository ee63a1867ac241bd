//! Domain typo detection and suggestion.
//!
//! An explicit table of frequent misspellings is consulted first; after
//! that the observed domain is compared against the trusted common-domain
//! list by Damerau-Levenshtein distance (transpositions count as one
//! edit). A candidate is only proposed when it is within the configured
//! threshold *and* strictly closer than the next-best candidate; ambiguous
//! ties propose nothing. This stage never mutates a domain, it only
//! proposes.

use phf::phf_map;
use textdistance::str::damerau_levenshtein;
use tracing::debug;

/// Explicit common misspellings mapped to intended domains.
static COMMON_FIXES: phf::Map<&'static str, &'static str> = phf_map! {
    "gmal.com" => "gmail.com",
    "gmial.com" => "gmail.com",
    "gmaill.com" => "gmail.com",
    "yaho.com" => "yahoo.com",
    "hotnail.com" => "hotmail.com",
};

/// A proposed domain correction.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub domain: String,
    pub distance: usize,
}

/// Suggest a likely correction for `domain`, or `None` when no candidate is
/// close enough or the closest candidates tie.
pub fn suggest_domain(
    domain: &str,
    common_domains: &[String],
    threshold: usize,
) -> Option<Suggestion> {
    if domain.is_empty() {
        return None;
    }

    if let Some(fix) = COMMON_FIXES.get(domain) {
        let suggestion = Suggestion {
            domain: (*fix).to_string(),
            distance: damerau_levenshtein(domain, fix),
        };
        debug!(domain, suggestion = %suggestion.domain, "explicit fix table hit");
        return Some(suggestion);
    }

    let mut best: Option<(usize, &str)> = None;
    let mut runner_up = usize::MAX;
    for candidate in common_domains {
        let distance = damerau_levenshtein(domain, candidate);
        match &mut best {
            None => best = Some((distance, candidate.as_str())),
            Some((best_distance, best_candidate)) => {
                if distance < *best_distance {
                    runner_up = *best_distance;
                    *best_distance = distance;
                    *best_candidate = candidate.as_str();
                } else if distance < runner_up {
                    runner_up = distance;
                }
            }
        }
    }

    let (distance, candidate) = best?;
    if distance == 0 || distance > threshold {
        return None;
    }
    // ambiguous: the winner must beat the next-best by at least one edit
    if runner_up <= distance {
        return None;
    }

    debug!(domain, suggestion = candidate, distance, "typo suggestion");
    Some(Suggestion {
        domain: candidate.to_string(),
        distance,
    })
}
