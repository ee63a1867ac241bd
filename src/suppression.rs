//! Suppression list: addresses that must never appear in the cleaned
//! output.
//!
//! Entries are normalized exactly like pipeline rows and matched
//! case-insensitively; matching rows are excluded before validation.

use std::collections::HashSet;

use crate::cleaner;
use crate::pipeline::PipelineError;
use crate::table::Table;

#[derive(Debug, Clone, Default)]
pub struct SuppressionList {
    entries: HashSet<String>,
}

impl SuppressionList {
    /// Build the set from raw address values; blanks are dropped.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = values
            .into_iter()
            .map(|value| cleaner::canonical_key(&cleaner::normalize_email(value.as_ref())))
            .filter(|canonical| !canonical.is_empty())
            .collect();
        Self { entries }
    }

    /// Build the set from one column of a tabular dataset.
    pub fn from_table(table: &Table, column: &str) -> Result<Self, PipelineError> {
        let index = table
            .column_index(column)
            .ok_or_else(|| PipelineError::ColumnNotFound(column.to_string()))?;
        Ok(Self::from_values(
            table
                .rows()
                .iter()
                .filter_map(|row| row.get(index))
                .map(String::as_str),
        ))
    }

    /// Membership test on a canonical (lowercased normalized) address.
    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.contains(canonical)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
