//! Static domain lists: disposable providers and common/trusted domains.
//!
//! Both lists are line-delimited files (`#` comments and blank lines
//! ignored), lowercased and deduplicated on load. They are loaded once at
//! startup and passed by reference into each pipeline run; a missing or
//! empty resource is a fatal configuration error, never a per-row failure.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

static BUNDLED_DISPOSABLE: &str = include_str!("../../data/disposable_domains.txt");
static BUNDLED_COMMON: &str = include_str!("../../data/common_domains.txt");

#[derive(Debug, Error)]
pub enum ListError {
    #[error("cannot read domain list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("domain list {path} contains no usable entries")]
    Empty { path: PathBuf },
}

/// The two static sets consumed by the pipeline.
#[derive(Debug, Clone)]
pub struct DomainLists {
    disposable: HashSet<String>,
    common: Vec<String>,
}

impl DomainLists {
    /// Lists compiled into the crate, for callers that do not ship their
    /// own data files.
    pub fn bundled() -> Self {
        let lists = Self {
            disposable: parse_lines(BUNDLED_DISPOSABLE).into_iter().collect(),
            common: parse_lines(BUNDLED_COMMON),
        };
        info!(
            disposable = lists.disposable.len(),
            common = lists.common.len(),
            "loaded bundled domain lists"
        );
        lists
    }

    /// Load both lists from files. Fails fast on unreadable or empty input.
    pub fn from_files(disposable: &Path, common: &Path) -> Result<Self, ListError> {
        let disposable_entries = read_list(disposable)?;
        let common_entries = read_list(common)?;
        info!(
            disposable = disposable_entries.len(),
            common = common_entries.len(),
            "loaded domain lists from files"
        );
        Ok(Self {
            disposable: disposable_entries.into_iter().collect(),
            common: common_entries,
        })
    }

    /// Build lists from in-memory values (tests, embedding callers).
    pub fn from_parts<I, J, S, T>(disposable: I, common: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let common = common
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty() && seen.insert(d.clone()))
            .collect();
        Self {
            disposable: disposable
                .into_iter()
                .map(|d| d.as_ref().trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            common,
        }
    }

    /// Exact, case-insensitive membership test on the domain segment.
    pub fn is_disposable(&self, domain: &str) -> bool {
        !domain.is_empty() && self.disposable.contains(&domain.to_lowercase())
    }

    /// Trusted domains used by the typo suggester, in file order.
    pub fn common_domains(&self) -> &[String] {
        &self.common
    }

    pub fn disposable_count(&self) -> usize {
        self.disposable.len()
    }
}

fn read_list(path: &Path) -> Result<Vec<String>, ListError> {
    let content = fs::read_to_string(path).map_err(|source| ListError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_lines(&content);
    if entries.is_empty() {
        return Err(ListError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(entries)
}

/// Lowercased, order-preserving, deduplicated entries; skips blanks and
/// `#` comments.
fn parse_lines(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    content
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| seen.insert(line.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_skips_comments_blanks_and_duplicates() {
        let entries = parse_lines("# header\nA.com\n\n b.com \na.com\n");
        assert_eq!(entries, vec!["a.com", "b.com"]);
    }

    #[test]
    fn disposable_match_is_exact_and_case_insensitive() {
        let lists = DomainLists::from_parts(["Mailinator.com"], ["gmail.com"]);
        assert!(lists.is_disposable("mailinator.com"));
        assert!(lists.is_disposable("MAILINATOR.COM"));
        assert!(!lists.is_disposable("sub.mailinator.com"));
        assert!(!lists.is_disposable(""));
    }

    #[test]
    fn bundled_lists_are_nonempty() {
        let lists = DomainLists::bundled();
        assert!(lists.disposable_count() > 0);
        assert!(!lists.common_domains().is_empty());
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = DomainLists::from_files(
            Path::new("/nonexistent/disposable.txt"),
            Path::new("/nonexistent/common.txt"),
        )
        .unwrap_err();
        assert!(matches!(err, ListError::Read { .. }));
    }
}
