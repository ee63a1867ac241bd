//! Minimal in-memory tabular dataset: a header row plus string rows.
//!
//! The pipeline receives one of these together with the name of the column
//! that holds email addresses; how the table was produced (CSV upload,
//! stdin, test fixture) is the caller's business.

/// A header row plus zero or more data rows, all values kept as strings.
///
/// Rows are padded or truncated to the header width on construction so the
/// rest of the crate never has to deal with ragged input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self { headers, rows }
    }

    /// Single-column table, handy for stdin input and tests.
    pub fn from_column<S, I, V>(name: S, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let rows = values.into_iter().map(|v| vec![v.into()]).collect();
        Self::new(vec![name.into()], rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_ragged_rows_to_header_width() {
        let table = Table::new(
            vec!["email".into(), "name".into()],
            vec![vec!["a@x.com".into()], vec!["b@x.com".into(), "B".into(), "extra".into()]],
        );
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn column_lookup_is_exact() {
        let table = Table::from_column("email", ["a@x.com"]);
        assert_eq!(table.column_index("email"), Some(0));
        assert_eq!(table.column_index("Email"), None);
    }
}
