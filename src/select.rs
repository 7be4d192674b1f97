//! Picking text files out of an export archive
//!
//! [`select_first`] and [`select_all`] differ on purpose when nothing
//! matches: the single-file variant fails with [`Error::NoMatch`] while the
//! multi-file variant returns an empty list.

use crate::archive::{Archive, ArchiveEntry};
use crate::error::{Error, Result};

/// Decoded text of the first entry whose name satisfies `predicate`
pub fn select_first<P>(archive: &Archive, predicate: P) -> Result<String>
where
    P: Fn(&str) -> bool,
{
    archive
        .entries()
        .iter()
        .find(|entry| predicate(&entry.name))
        .map(ArchiveEntry::text)
        .ok_or_else(|| {
            Error::NoMatch(format!(
                "no matching entry among {} archive entries",
                archive.len()
            ))
        })
}

/// Decoded text of every entry whose name satisfies `predicate`, in archive order
pub fn select_all<P>(archive: &Archive, predicate: P) -> Vec<String>
where
    P: Fn(&str) -> bool,
{
    archive
        .entries()
        .iter()
        .filter(|entry| predicate(&entry.name))
        .map(ArchiveEntry::text)
        .collect()
}

/// Matches Markdown pages
pub fn is_markdown(name: &str) -> bool {
    name.ends_with(".md")
}

/// Matches database CSV exports
///
/// Notion writes both `Name.csv` (current view) and `Name_all.csv` (every
/// row). With `only_current_view` any CSV matches, otherwise only `_all.csv`.
pub fn is_csv(only_current_view: bool) -> impl Fn(&str) -> bool {
    move |name: &str| {
        if only_current_view {
            name.ends_with(".csv")
        } else {
            name.ends_with("_all.csv")
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::zip_bytes;

    fn sample_archive() -> Archive {
        Archive::from_bytes(zip_bytes(&[
            ("a.md", b"hello"),
            ("b.csv", b"x,y"),
            ("sub/c.md", b"world"),
        ]))
        .unwrap()
    }

    #[test]
    fn select_all_returns_matches_in_entry_order() {
        assert_eq!(
            select_all(&sample_archive(), is_markdown),
            vec!["hello".to_string(), "world".to_string()]
        );
    }

    #[test]
    fn select_all_with_no_match_is_empty() {
        assert!(select_all(&sample_archive(), |name| name.ends_with(".pdf")).is_empty());
    }

    #[test]
    fn select_first_returns_first_match() {
        assert_eq!(select_first(&sample_archive(), is_markdown).unwrap(), "hello");
    }

    #[test]
    fn select_first_with_no_match_is_no_match_error() {
        let err = select_first(&sample_archive(), |name| name.ends_with(".pdf")).unwrap_err();
        assert!(matches!(err, Error::NoMatch(_)), "got {err:?}");
    }

    #[test]
    fn selected_text_is_trimmed() {
        let archive = Archive::from_bytes(zip_bytes(&[("Page.md", b"\n\n# Page\n\nbody\n  ")]))
            .unwrap();
        assert_eq!(select_first(&archive, is_markdown).unwrap(), "# Page\n\nbody");
    }

    #[test]
    fn csv_predicate_respects_current_view_flag() {
        let archive = Archive::from_bytes(zip_bytes(&[
            ("Tasks.csv", b"Name\nview"),
            ("Tasks_all.csv", b"Name\nall"),
        ]))
        .unwrap();

        assert_eq!(select_first(&archive, is_csv(true)).unwrap(), "Name\nview");
        assert_eq!(select_first(&archive, is_csv(false)).unwrap(), "Name\nall");
    }
}
