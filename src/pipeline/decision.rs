//! Safe-Mode decision engine.
//!
//! One ordered decision table per record, so the precedence between
//! syntax, disposable and MX signals stays auditable. Safe Mode only
//! affects the auto-fix, disposable and mx-unknown arms; blank, duplicate
//! and missing-MX failures are hard regardless.

use crate::mx::MxStatus;
use crate::suggest::Suggestion;

use super::types::{Disposition, ReasonCode};

/// Per-row inputs to the decision table. Blank/duplicate/suppressed rows
/// are terminal before this point and never reach it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowSignals<'a> {
    pub syntax_valid: bool,
    /// The local part passed and only the domain failed, so an accepted
    /// suggestion can actually repair the address.
    pub domain_fixable: bool,
    pub disposable: bool,
    pub mx: MxStatus,
    pub suggestion: Option<&'a Suggestion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Verdict {
    pub disposition: Disposition,
    pub reason: Option<ReasonCode>,
    pub apply_suggestion: bool,
}

impl Verdict {
    fn new(disposition: Disposition, reason: Option<ReasonCode>) -> Self {
        Self {
            disposition,
            reason,
            apply_suggestion: false,
        }
    }
}

pub(crate) fn decide(signals: &RowSignals<'_>, safe_mode: bool) -> Verdict {
    if !signals.syntax_valid {
        if safe_mode && signals.domain_fixable && signals.suggestion.is_some() {
            return Verdict {
                disposition: Disposition::AutoFixed,
                reason: Some(ReasonCode::TypoFixed),
                apply_suggestion: true,
            };
        }
        return Verdict::new(Disposition::Rejected, Some(ReasonCode::InvalidSyntax));
    }

    if signals.disposable {
        return if safe_mode {
            Verdict::new(Disposition::FlaggedKept, Some(ReasonCode::DisposableDomain))
        } else {
            Verdict::new(Disposition::Rejected, Some(ReasonCode::DisposableDomain))
        };
    }

    match signals.mx {
        MxStatus::NoMx => Verdict::new(Disposition::Rejected, Some(ReasonCode::NoMxRecord)),
        MxStatus::Unknown => {
            if safe_mode {
                Verdict::new(Disposition::FlaggedKept, Some(ReasonCode::MxUnknown))
            } else {
                Verdict::new(Disposition::Rejected, Some(ReasonCode::MxUnknown))
            }
        }
        MxStatus::NotChecked | MxStatus::Valid => Verdict::new(Disposition::Accepted, None),
    }
}
