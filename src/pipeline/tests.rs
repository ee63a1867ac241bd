use std::collections::HashMap;

use super::*;
use crate::config::CleanOptions;
use crate::lists::DomainLists;
use crate::suppression::SuppressionList;
use crate::table::Table;

fn lists() -> DomainLists {
    DomainLists::from_parts(
        ["disposable-test.tld", "mailinator.com"],
        ["gmail.com", "yahoo.com", "hotmail.com"],
    )
}

fn options() -> CleanOptions {
    CleanOptions::default()
}

fn emails(rows: &[ClassifiedRow]) -> Vec<&str> {
    rows.iter().map(|r| r.final_value()).collect()
}

#[test]
fn reference_scenario_safe_mode_on() {
    let table = Table::from_column(
        "email",
        ["a@a.com", " A@A.COM ", "bad", "", "x@disposable-test.tld"],
    );
    let result = clean_list(&table, "email", &lists(), None, &options()).unwrap();

    assert_eq!(emails(&result.cleaned), ["a@a.com", "x@disposable-test.tld"]);
    assert_eq!(result.cleaned[0].disposition, Disposition::Accepted);
    assert_eq!(result.cleaned[1].disposition, Disposition::FlaggedKept);
    assert_eq!(result.cleaned[1].reason, Some(ReasonCode::DisposableDomain));

    assert_eq!(result.rejected.len(), 3);
    assert_eq!(result.rejected[0].reason, Some(ReasonCode::Duplicate));
    assert_eq!(result.rejected[0].record.row_index, 1);
    assert_eq!(result.rejected[1].reason, Some(ReasonCode::InvalidSyntax));
    assert_eq!(result.rejected[2].reason, Some(ReasonCode::Blank));

    assert_eq!(result.summary.total_rows, 5);
    assert_eq!(result.summary.cleaned_rows, 2);
    assert_eq!(result.summary.rejected_rows, 3);
    assert_eq!(result.summary.valid_rate_pct, 40.0);
}

#[test]
fn every_row_lands_in_exactly_one_partition() {
    let table = Table::from_column(
        "email",
        ["a@a.com", "b@b.com", "a@a.com", "", "junk", "x@mailinator.com"],
    );
    let result = clean_list(&table, "email", &lists(), None, &options()).unwrap();
    assert_eq!(
        result.cleaned.len() + result.rejected.len() + result.suppressed.len(),
        table.len()
    );
}

#[test]
fn dedup_is_case_insensitive_and_first_wins() {
    let table = Table::from_column("email", ["A@Example.com", "a@example.com"]);
    let result = clean_list(&table, "email", &lists(), None, &options()).unwrap();
    assert_eq!(result.cleaned.len(), 1);
    // survivor keeps the original local-part case
    assert_eq!(result.cleaned[0].record.normalized_value, "A@example.com");
    assert_eq!(result.rejected.len(), 1);
    assert_eq!(result.rejected[0].reason, Some(ReasonCode::Duplicate));
    assert_eq!(result.rejected[0].record.row_index, 1);
}

#[test]
fn pipeline_is_idempotent_without_mx() {
    let table = Table::from_column(
        "email",
        ["a@a.com", "user@gmial.com", "bad", "x@disposable-test.tld", "a@a.com"],
    );
    let first = clean_list(&table, "email", &lists(), None, &options()).unwrap();
    let second = clean_list(&table, "email", &lists(), None, &options()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_table_yields_empty_result() {
    let table = Table::from_column("email", Vec::<String>::new());
    let result = clean_list(&table, "email", &lists(), None, &options()).unwrap();
    assert!(result.cleaned.is_empty());
    assert!(result.rejected.is_empty());
    assert_eq!(result.summary.total_rows, 0);
    assert_eq!(result.summary.valid_rate_pct, 0.0);
}

#[test]
fn unknown_column_is_fatal() {
    let table = Table::from_column("email", ["a@a.com"]);
    let err = clean_list(&table, "mail", &lists(), None, &options()).unwrap_err();
    assert!(matches!(err, PipelineError::ColumnNotFound(_)));
}

#[test]
fn domain_typo_is_auto_fixed_in_safe_mode() {
    let table = Table::from_column("email", ["user@gmail,com"]);
    let result = clean_list(&table, "email", &lists(), None, &options()).unwrap();

    assert_eq!(result.cleaned.len(), 1);
    let row = &result.cleaned[0];
    assert_eq!(row.disposition, Disposition::AutoFixed);
    assert_eq!(row.reason, Some(ReasonCode::TypoFixed));
    assert_eq!(row.applied_fix.as_deref(), Some("user@gmail.com"));
    assert_eq!(row.final_value(), "user@gmail.com");
    assert_eq!(row.outcome.suggested_domain.as_deref(), Some("gmail.com"));
    assert_eq!(row.outcome.suggestion_distance, Some(1));
    // the record itself is never mutated
    assert_eq!(row.record.normalized_value, "user@gmail,com");
}

#[test]
fn domain_typo_is_rejected_with_safe_mode_off() {
    let table = Table::from_column("email", ["user@gmail,com"]);
    let opts = CleanOptions {
        safe_mode: false,
        ..options()
    };
    let result = clean_list(&table, "email", &lists(), None, &opts).unwrap();
    assert!(result.cleaned.is_empty());
    assert_eq!(result.rejected[0].reason, Some(ReasonCode::InvalidSyntax));
    // the proposal still rides along as an annotation
    assert_eq!(
        result.rejected[0].outcome.suggested_domain.as_deref(),
        Some("gmail.com")
    );
}

#[test]
fn disposable_is_rejected_with_safe_mode_off() {
    let table = Table::from_column("email", ["x@disposable-test.tld"]);
    let opts = CleanOptions {
        safe_mode: false,
        ..options()
    };
    let result = clean_list(&table, "email", &lists(), None, &opts).unwrap();
    assert!(result.cleaned.is_empty());
    assert_eq!(result.rejected[0].reason, Some(ReasonCode::DisposableDomain));
}

#[test]
fn safe_mode_off_cleaned_set_is_subset_of_safe_mode_on() {
    let table = Table::from_column(
        "email",
        [
            "a@a.com",
            "user@gmail,com",
            "x@disposable-test.tld",
            "bad",
            "",
            "b@b.org",
        ],
    );
    let on = clean_list(&table, "email", &lists(), None, &options()).unwrap();
    let off = clean_list(
        &table,
        "email",
        &lists(),
        None,
        &CleanOptions {
            safe_mode: false,
            ..options()
        },
    )
    .unwrap();

    let on_keys: Vec<String> = on.cleaned.iter().map(|r| r.record.canonical_key()).collect();
    for row in &off.cleaned {
        assert!(
            on_keys.contains(&row.record.canonical_key()),
            "{} accepted with safe mode off but missing with safe mode on",
            row.record.normalized_value
        );
    }
    assert!(off.cleaned.len() <= on.cleaned.len());
}

#[test]
fn suppression_excludes_rows_before_validation() {
    let table = Table::from_column("email", ["a@x.com", "B@X.COM", "c@x.com"]);
    let suppression = SuppressionList::from_values(["b@x.com"]);
    let result = clean_list(&table, "email", &lists(), Some(&suppression), &options()).unwrap();

    assert_eq!(emails(&result.cleaned), ["a@x.com", "c@x.com"]);
    assert_eq!(result.suppressed.len(), 1);
    assert_eq!(result.suppressed[0].disposition, Disposition::Suppressed);
    assert_eq!(result.suppressed[0].reason, Some(ReasonCode::Suppressed));
    assert_eq!(result.summary.suppressed_rows, 1);
    assert_eq!(
        result.cleaned.len() + result.rejected.len() + result.suppressed.len(),
        table.len()
    );
}

#[test]
fn suppressed_rows_do_not_consume_the_dedup_slot() {
    let table = Table::from_column("email", ["a@x.com", "a@x.com"]);
    let suppression = SuppressionList::from_values(["a@x.com"]);
    let result = clean_list(&table, "email", &lists(), Some(&suppression), &options()).unwrap();
    // both rows match the suppression list; neither is a duplicate
    assert_eq!(result.suppressed.len(), 2);
    assert!(result.rejected.is_empty());
}

#[test]
fn histogram_covers_rejected_and_suppressed_rows() {
    let table = Table::from_column("email", ["a@x.com", "bad", "worse", "s@x.com"]);
    let suppression = SuppressionList::from_values(["s@x.com"]);
    let result = clean_list(&table, "email", &lists(), Some(&suppression), &options()).unwrap();
    let stats = result.reasons_histogram();
    assert_eq!(stats[0].reason, ReasonCode::InvalidSyntax);
    assert_eq!(stats[0].count, 2);
    assert_eq!(stats[0].percent, 66.67);
    assert_eq!(stats[1].reason, ReasonCode::Suppressed);
    assert_eq!(stats[1].count, 1);
}

// The MX stage proper lives behind `with-mx`; the classification flow is
// exercised here by injecting a prebuilt domain map through the internal
// seam, network-free.

fn run_with_mx_map(
    table: &Table,
    mx_map: HashMap<String, MxStatus>,
    safe_mode: bool,
) -> PipelineResult {
    let opts = CleanOptions {
        enable_mx_check: true,
        safe_mode,
        ..options()
    };
    let column = table.column_index("email").unwrap();
    let staged = stage_rows(table, column, &lists(), None);
    assemble(table.len(), staged, &mx_map, &lists(), &opts)
}

#[test]
fn unknown_mx_flags_every_row_of_the_domain() {
    let table = Table::from_column(
        "email",
        ["a@slow.example", "b@slow.example", "c@slow.example"],
    );
    let mx_map = HashMap::from([("slow.example".to_string(), MxStatus::Unknown)]);
    let result = run_with_mx_map(&table, mx_map, true);

    assert_eq!(result.cleaned.len(), 3);
    for row in &result.cleaned {
        assert_eq!(row.disposition, Disposition::FlaggedKept);
        assert_eq!(row.reason, Some(ReasonCode::MxUnknown));
        assert_eq!(row.outcome.mx_status, MxStatus::Unknown);
    }
}

#[test]
fn unknown_mx_rejects_with_safe_mode_off() {
    let table = Table::from_column("email", ["a@slow.example"]);
    let mx_map = HashMap::from([("slow.example".to_string(), MxStatus::Unknown)]);
    let result = run_with_mx_map(&table, mx_map, false);
    assert_eq!(result.rejected[0].reason, Some(ReasonCode::MxUnknown));
}

#[test]
fn missing_mx_is_rejected_regardless_of_safe_mode() {
    let table = Table::from_column("email", ["a@dead.example"]);
    let mx_map = HashMap::from([("dead.example".to_string(), MxStatus::NoMx)]);
    for safe_mode in [true, false] {
        let result = run_with_mx_map(&table, mx_map.clone(), safe_mode);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].reason, Some(ReasonCode::NoMxRecord));
    }
}

#[test]
fn no_mx_rows_still_carry_a_domain_suggestion() {
    let table = Table::from_column("email", ["user@gmall.com"]);
    let mx_map = HashMap::from([("gmall.com".to_string(), MxStatus::NoMx)]);
    let result = run_with_mx_map(&table, mx_map, true);
    let row = &result.rejected[0];
    assert_eq!(row.reason, Some(ReasonCode::NoMxRecord));
    assert_eq!(row.outcome.suggested_domain.as_deref(), Some("gmail.com"));
}

#[test]
fn valid_mx_rows_are_accepted() {
    let table = Table::from_column("email", ["a@ok.example"]);
    let mx_map = HashMap::from([("ok.example".to_string(), MxStatus::Valid)]);
    let result = run_with_mx_map(&table, mx_map, true);
    assert_eq!(result.cleaned[0].disposition, Disposition::Accepted);
    assert_eq!(result.cleaned[0].outcome.mx_status, MxStatus::Valid);
}

#[test]
fn disposable_rows_skip_the_mx_stage() {
    let table = Table::from_column("email", ["x@disposable-test.tld"]);
    let result = run_with_mx_map(&table, HashMap::new(), true);
    assert_eq!(result.cleaned[0].outcome.mx_status, MxStatus::NotChecked);
    assert_eq!(result.cleaned[0].reason, Some(ReasonCode::DisposableDomain));
}
