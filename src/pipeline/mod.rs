//! The cleaning & validation pipeline.
//!
//! Data flows strictly forward: raw rows → (suppression) → normalization &
//! dedup → syntax validation → disposable check → optional MX resolution →
//! typo suggestion → safe-mode decision → partitioned result. No stage
//! mutates a row after it has been classified; each stage only adds
//! annotations. Malformed rows are classified, never fatal; only
//! configuration problems abort a run.

mod decision;
mod summary;
mod types;

#[cfg(test)]
mod tests;

pub use summary::{ReasonStat, Summary, reasons_histogram};
pub use types::{
    ClassifiedRow, Disposition, EmailRecord, PipelineResult, ReasonCode, ValidationOutcome,
};

use std::collections::HashMap;
use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::CleanOptions;
use crate::lists::DomainLists;
use crate::mx::MxStatus;
use crate::suggest;
use crate::suppression::SuppressionList;
use crate::table::Table;
use crate::validator::{self, SyntaxReport};

use decision::RowSignals;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("email column '{0}' not found in input header")]
    ColumnNotFound(String),
    #[error("MX checking requested but this build lacks the 'with-mx' feature")]
    MxUnavailable,
}

/// Run the full pipeline over one table.
///
/// `email_column` names the column holding addresses; `lists` are the
/// static domain sets loaded once at startup; `suppression` optionally
/// excludes addresses before validation. Every input row comes back in
/// exactly one partition.
pub fn clean_list(
    table: &Table,
    email_column: &str,
    lists: &DomainLists,
    suppression: Option<&SuppressionList>,
    options: &CleanOptions,
) -> Result<PipelineResult, PipelineError> {
    let column = table
        .column_index(email_column)
        .ok_or_else(|| PipelineError::ColumnNotFound(email_column.to_string()))?;

    #[cfg(not(feature = "with-mx"))]
    if options.enable_mx_check {
        return Err(PipelineError::MxUnavailable);
    }

    info!(rows = table.len(), safe_mode = options.safe_mode, "cleaning list");

    let staged = stage_rows(table, column, lists, suppression);

    #[cfg(feature = "with-mx")]
    let mx_map = if options.enable_mx_check {
        let domains = mx_candidates(&staged);
        info!(domains = domains.len(), "resolving MX for unique domains");
        crate::mx::check_domains(
            &domains,
            &crate::mx::MxPoolOptions {
                timeout: options.mx_timeout,
                deadline: options.mx_deadline,
                max_workers: options.max_concurrent_mx_lookups,
            },
        )
    } else {
        HashMap::new()
    };
    #[cfg(not(feature = "with-mx"))]
    let mx_map: HashMap<String, MxStatus> = HashMap::new();

    let result = assemble(table.len(), staged, &mx_map, lists, options);
    info!(
        cleaned = result.summary.cleaned_rows,
        rejected = result.summary.rejected_rows,
        suppressed = result.summary.suppressed_rows,
        "pipeline finished"
    );
    Ok(result)
}

/// A row after normalization, dedup and the per-row checks, before the MX
/// stage and the final decision.
pub(crate) enum Staged {
    /// Terminal at normalization time: suppressed, blank or duplicate.
    Early(EmailRecord, ReasonCode),
    Live {
        record: EmailRecord,
        report: SyntaxReport,
        disposable: bool,
    },
}

pub(crate) fn stage_rows(
    table: &Table,
    column: usize,
    lists: &DomainLists,
    suppression: Option<&SuppressionList>,
) -> Vec<Staged> {
    let mut staged = Vec::with_capacity(table.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in table.rows().iter().enumerate() {
        let raw = row.get(column).map(String::as_str).unwrap_or("");
        let record = EmailRecord::from_raw(index, raw);
        let canonical = record.canonical_key();

        if !canonical.is_empty() && suppression.is_some_and(|s| s.contains(&canonical)) {
            staged.push(Staged::Early(record, ReasonCode::Suppressed));
            continue;
        }
        if record.is_blank() {
            staged.push(Staged::Early(record, ReasonCode::Blank));
            continue;
        }
        if !seen.insert(canonical) {
            // first occurrence wins, later ones are recorded, not dropped
            staged.push(Staged::Early(record, ReasonCode::Duplicate));
            continue;
        }

        let report = validator::check_syntax(&record.normalized_value);
        let disposable = lists.is_disposable(&record.domain);
        staged.push(Staged::Live {
            record,
            report,
            disposable,
        });
    }
    staged
}

/// Unique domains eligible for the MX stage: syntactically valid and not
/// disposable. Sorted so lookup order (and with it the run) stays
/// deterministic.
#[cfg(feature = "with-mx")]
fn mx_candidates(staged: &[Staged]) -> std::collections::BTreeSet<String> {
    staged
        .iter()
        .filter_map(|row| match row {
            Staged::Live {
                record,
                report,
                disposable: false,
            } if report.ok && !record.domain.is_empty() => Some(record.domain.clone()),
            _ => None,
        })
        .collect()
}

pub(crate) fn assemble(
    total_rows: usize,
    staged: Vec<Staged>,
    mx_map: &HashMap<String, MxStatus>,
    lists: &DomainLists,
    options: &CleanOptions,
) -> PipelineResult {
    let mut cleaned = Vec::new();
    let mut rejected = Vec::new();
    let mut suppressed = Vec::new();

    for row in staged {
        match row {
            Staged::Early(record, reason) => {
                let disposition = if reason == ReasonCode::Suppressed {
                    Disposition::Suppressed
                } else {
                    Disposition::Rejected
                };
                let classified = ClassifiedRow {
                    record,
                    outcome: ValidationOutcome::default(),
                    disposition,
                    reason: Some(reason),
                    applied_fix: None,
                };
                match disposition {
                    Disposition::Suppressed => suppressed.push(classified),
                    _ => rejected.push(classified),
                }
            }
            Staged::Live {
                record,
                report,
                disposable,
            } => {
                let mx = if options.enable_mx_check && report.ok && !disposable {
                    mx_map
                        .get(&record.domain)
                        .copied()
                        .unwrap_or(MxStatus::Unknown)
                } else {
                    MxStatus::NotChecked
                };

                let domain_fixable = report.local_ok && !report.domain_ok;
                let wants_suggestion = !record.domain.is_empty()
                    && (domain_fixable || mx == MxStatus::NoMx);
                let suggestion = if wants_suggestion {
                    suggest::suggest_domain(
                        &record.domain,
                        lists.common_domains(),
                        options.typo_distance_threshold,
                    )
                } else {
                    None
                };

                let verdict = decision::decide(
                    &RowSignals {
                        syntax_valid: report.ok,
                        domain_fixable,
                        disposable,
                        mx,
                        suggestion: suggestion.as_ref(),
                    },
                    options.safe_mode,
                );

                let applied_fix = if verdict.apply_suggestion {
                    suggestion
                        .as_ref()
                        .map(|s| format!("{}@{}", record.local_part, s.domain))
                } else {
                    None
                };
                debug!(
                    address = %record.normalized_value,
                    disposition = %verdict.disposition,
                    "row classified"
                );

                let classified = ClassifiedRow {
                    record,
                    outcome: ValidationOutcome {
                        is_syntax_valid: report.ok,
                        is_disposable: disposable,
                        mx_status: mx,
                        suggested_domain: suggestion.as_ref().map(|s| s.domain.clone()),
                        suggestion_distance: suggestion.as_ref().map(|s| s.distance),
                    },
                    disposition: verdict.disposition,
                    reason: verdict.reason,
                    applied_fix,
                };
                match verdict.disposition {
                    Disposition::Rejected => rejected.push(classified),
                    Disposition::Suppressed => suppressed.push(classified),
                    _ => cleaned.push(classified),
                }
            }
        }
    }

    let summary = summary::summarize(total_rows, &cleaned, &rejected, &suppressed);
    PipelineResult {
        cleaned,
        rejected,
        suppressed,
        summary,
    }
}
