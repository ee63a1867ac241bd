//! KPI aggregation over final dispositions. Pure; no I/O.

use std::collections::BTreeMap;
use std::fmt;

use super::types::{ClassifiedRow, Disposition, ReasonCode};

/// Aggregated counts for one pipeline run.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_rows: usize,
    pub cleaned_rows: usize,
    pub rejected_rows: usize,
    pub suppressed_rows: usize,
    /// `round(cleaned / total * 100, 2)`; `0.0` when the input is empty.
    pub valid_rate_pct: f64,
    pub accepted: usize,
    pub auto_fixed: usize,
    pub flagged_kept: usize,
    /// Optional runtime attached by the caller.
    pub duration_s: Option<f64>,
}

impl Summary {
    pub fn with_duration(mut self, duration_s: f64) -> Self {
        // millisecond precision is plenty for a KPI line
        self.duration_s = Some((duration_s * 1000.0).round() / 1000.0);
        self
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "processed {} rows", self.total_rows)?;
        if let Some(duration) = self.duration_s {
            write!(f, " in {duration}s")?;
        }
        write!(
            f,
            " -> {} cleaned, {} rejected",
            self.cleaned_rows, self.rejected_rows
        )?;
        if self.suppressed_rows > 0 {
            write!(f, ", {} suppressed", self.suppressed_rows)?;
        }
        write!(f, " ({}% valid)", self.valid_rate_pct)
    }
}

/// One row of the rejection-reasons histogram.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonStat {
    pub reason: ReasonCode,
    pub count: usize,
    /// Percentage over the rows that carry *any* reason, rounded to 2
    /// decimals.
    pub percent: f64,
}

pub(crate) fn summarize(
    total_rows: usize,
    cleaned: &[ClassifiedRow],
    rejected: &[ClassifiedRow],
    suppressed: &[ClassifiedRow],
) -> Summary {
    let mut accepted = 0;
    let mut auto_fixed = 0;
    let mut flagged_kept = 0;
    for row in cleaned {
        match row.disposition {
            Disposition::Accepted => accepted += 1,
            Disposition::AutoFixed => auto_fixed += 1,
            Disposition::FlaggedKept => flagged_kept += 1,
            Disposition::Rejected | Disposition::Suppressed => {}
        }
    }

    let valid_rate_pct = if total_rows == 0 {
        0.0
    } else {
        round2(cleaned.len() as f64 / total_rows as f64 * 100.0)
    };

    Summary {
        total_rows,
        cleaned_rows: cleaned.len(),
        rejected_rows: rejected.len(),
        suppressed_rows: suppressed.len(),
        valid_rate_pct,
        accepted,
        auto_fixed,
        flagged_kept,
        duration_s: None,
    }
}

/// Counts and percentages for reason codes, sorted by count descending then
/// reason. Percent is computed over the rows that had any reason present.
pub fn reasons_histogram<'a, I>(rows: I) -> Vec<ReasonStat>
where
    I: IntoIterator<Item = &'a ClassifiedRow>,
{
    let mut counts: BTreeMap<ReasonCode, usize> = BTreeMap::new();
    let mut rows_with_reasons = 0usize;
    for row in rows {
        if let Some(reason) = row.reason {
            rows_with_reasons += 1;
            *counts.entry(reason).or_default() += 1;
        }
    }
    if rows_with_reasons == 0 {
        return Vec::new();
    }

    let mut stats: Vec<ReasonStat> = counts
        .into_iter()
        .map(|(reason, count)| ReasonStat {
            reason,
            count,
            percent: round2(count as f64 / rows_with_reasons as f64 * 100.0),
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count).then(a.reason.cmp(&b.reason)));
    stats
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{EmailRecord, ValidationOutcome};

    fn row(disposition: Disposition, reason: Option<ReasonCode>) -> ClassifiedRow {
        ClassifiedRow {
            record: EmailRecord::from_raw(0, "a@x.com"),
            outcome: ValidationOutcome::default(),
            disposition,
            reason,
            applied_fix: None,
        }
    }

    #[test]
    fn empty_input_yields_zero_rate() {
        let summary = summarize(0, &[], &[], &[]);
        assert_eq!(summary.total_rows, 0);
        assert_eq!(summary.valid_rate_pct, 0.0);
    }

    #[test]
    fn rate_is_rounded_to_two_decimals() {
        let cleaned = vec![row(Disposition::Accepted, None)];
        let rejected = vec![
            row(Disposition::Rejected, Some(ReasonCode::Blank)),
            row(Disposition::Rejected, Some(ReasonCode::Blank)),
        ];
        let summary = summarize(3, &cleaned, &rejected, &[]);
        assert_eq!(summary.valid_rate_pct, 33.33);
    }

    #[test]
    fn renders_summary_line() {
        let summary = summarize(
            5,
            &[
                row(Disposition::Accepted, None),
                row(Disposition::FlaggedKept, Some(ReasonCode::DisposableDomain)),
            ],
            &[
                row(Disposition::Rejected, Some(ReasonCode::Duplicate)),
                row(Disposition::Rejected, Some(ReasonCode::InvalidSyntax)),
                row(Disposition::Rejected, Some(ReasonCode::Blank)),
            ],
            &[],
        );
        insta::assert_snapshot!(
            summary.to_string(),
            @"processed 5 rows -> 2 cleaned, 3 rejected (40% valid)"
        );
    }

    #[test]
    fn renders_suppressed_count_when_present() {
        let summary = summarize(
            2,
            &[row(Disposition::Accepted, None)],
            &[],
            &[row(Disposition::Suppressed, Some(ReasonCode::Suppressed))],
        );
        insta::assert_snapshot!(
            summary.to_string(),
            @"processed 2 rows -> 1 cleaned, 0 rejected, 1 suppressed (50% valid)"
        );
    }

    #[test]
    fn histogram_counts_and_percentages() {
        let rows = vec![
            row(Disposition::Rejected, Some(ReasonCode::InvalidSyntax)),
            row(Disposition::Rejected, Some(ReasonCode::InvalidSyntax)),
            row(Disposition::Rejected, Some(ReasonCode::Blank)),
            row(Disposition::Accepted, None),
        ];
        let stats = reasons_histogram(&rows);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].reason, ReasonCode::InvalidSyntax);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].percent, 66.67);
        assert_eq!(stats[1].reason, ReasonCode::Blank);
        assert_eq!(stats[1].percent, 33.33);
    }

    #[test]
    fn histogram_of_unreasoned_rows_is_empty() {
        let rows = vec![row(Disposition::Accepted, None)];
        assert!(reasons_histogram(&rows).is_empty());
    }
}
