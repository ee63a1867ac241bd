use std::fmt;

use crate::cleaner;
use crate::mx::MxStatus;

/// One input row, normalized. Immutable once built; created exactly once
/// per input row and never duplicated in the output.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    /// 0-based position in the input, header excluded.
    pub row_index: usize,
    /// Original value exactly as uploaded.
    pub raw_value: String,
    /// Trimmed, interior spaces removed, domain lowercased; local-part case
    /// preserved.
    pub normalized_value: String,
    pub local_part: String,
    /// Always lowercase; empty when the value has no `@`.
    pub domain: String,
}

impl EmailRecord {
    pub fn from_raw(row_index: usize, raw: &str) -> Self {
        let value = cleaner::normalize_email(raw);
        let (local, domain) = cleaner::split_local_domain(&value);
        let local_part = local.to_string();
        let normalized_value = if domain.is_empty() {
            value.clone()
        } else {
            format!("{local_part}@{domain}")
        };
        Self {
            row_index,
            raw_value: raw.to_string(),
            normalized_value,
            local_part,
            domain,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.normalized_value.is_empty()
    }

    /// Case-insensitive form used for deduplication and suppression.
    pub fn canonical_key(&self) -> String {
        cleaner::canonical_key(&self.normalized_value)
    }
}

/// Signals gathered for a record across the validation stages.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationOutcome {
    pub is_syntax_valid: bool,
    pub is_disposable: bool,
    pub mx_status: MxStatus,
    pub suggested_domain: Option<String>,
    pub suggestion_distance: Option<usize>,
}

/// Final classification of a record.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Disposition {
    Accepted,
    AutoFixed,
    FlaggedKept,
    Rejected,
    Suppressed,
}

impl Disposition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::AutoFixed => "auto_fixed",
            Self::FlaggedKept => "flagged_kept",
            Self::Rejected => "rejected",
            Self::Suppressed => "suppressed",
        }
    }
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of machine-checkable reason codes.
#[cfg_attr(
    feature = "with-serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReasonCode {
    Blank,
    Duplicate,
    InvalidSyntax,
    DisposableDomain,
    NoMxRecord,
    MxUnknown,
    TypoFixed,
    Suppressed,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::Duplicate => "duplicate",
            Self::InvalidSyntax => "invalid_syntax",
            Self::DisposableDomain => "disposable_domain",
            Self::NoMxRecord => "no_mx_record",
            Self::MxUnknown => "mx_unknown",
            Self::TypoFixed => "typo_fixed",
            Self::Suppressed => "suppressed",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record together with everything the pipeline decided about it.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub record: EmailRecord,
    pub outcome: ValidationOutcome,
    pub disposition: Disposition,
    pub reason: Option<ReasonCode>,
    /// Corrected address, only present when `disposition == AutoFixed`.
    pub applied_fix: Option<String>,
}

impl ClassifiedRow {
    /// Value to export: the applied fix when present, otherwise the
    /// normalized address.
    pub fn final_value(&self) -> &str {
        self.applied_fix
            .as_deref()
            .unwrap_or(&self.record.normalized_value)
    }
}

/// The output partitions plus the aggregated summary.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub cleaned: Vec<ClassifiedRow>,
    pub rejected: Vec<ClassifiedRow>,
    pub suppressed: Vec<ClassifiedRow>,
    pub summary: super::Summary,
}

impl PipelineResult {
    /// Histogram of reasons over the excluded rows (rejected + suppressed),
    /// mirroring the "why were emails excluded?" insight.
    pub fn reasons_histogram(&self) -> Vec<super::ReasonStat> {
        super::reasons_histogram(self.rejected.iter().chain(self.suppressed.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_normalizes_and_preserves_local_case() {
        let record = EmailRecord::from_raw(0, "  Alice@Example.COM ");
        assert_eq!(record.normalized_value, "Alice@example.com");
        assert_eq!(record.local_part, "Alice");
        assert_eq!(record.domain, "example.com");
        assert_eq!(record.canonical_key(), "alice@example.com");
        assert_eq!(record.raw_value, "  Alice@Example.COM ");
    }

    #[test]
    fn record_without_at_has_empty_domain() {
        let record = EmailRecord::from_raw(3, "bad");
        assert_eq!(record.normalized_value, "bad");
        assert_eq!(record.domain, "");
        assert!(!record.is_blank());
    }

    #[test]
    fn blank_record() {
        let record = EmailRecord::from_raw(1, "   ");
        assert!(record.is_blank());
    }

    #[test]
    fn final_value_prefers_applied_fix() {
        let record = EmailRecord::from_raw(0, "user@gmail,com");
        let row = ClassifiedRow {
            record,
            outcome: ValidationOutcome::default(),
            disposition: Disposition::AutoFixed,
            reason: Some(ReasonCode::TypoFixed),
            applied_fix: Some("user@gmail.com".to_string()),
        };
        assert_eq!(row.final_value(), "user@gmail.com");
    }
}
