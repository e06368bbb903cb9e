//! Deterministic classification of operation target paths.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::{Component, Path};

/// Semantic label derived from a path. A path may carry several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tag {
    /// Extension is `.md` (case-insensitive).
    Markdown,
    /// File stem is on the explore-phase allow-list.
    ExploreAllowed,
    /// Some full path segment is `tests` or `test` (case-insensitive).
    TestDir,
    /// Some full path segment is `temp` (case-insensitive).
    TempDir,
    /// The phase store's backing file: `current_phase` under a `.claude`
    /// ancestor (both case-sensitive).
    PhaseStateFile,
}

/// File stems whose edits the explore phase admits, extension-exclusive.
pub const EXPLORE_ALLOW_LIST: [&str; 4] = ["TODO", "QUALITY", "DESIGN", "CLAUDE"];

/// Classify `path` into its tag set.
///
/// Pure and total: every input yields some (possibly empty) set, and
/// repeated calls agree. Segment checks match whole components, never
/// substrings, so `src/testsuite` is not a test directory.
pub fn classify(path: &Path) -> BTreeSet<Tag> {
    let mut tags = BTreeSet::new();

    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
    {
        tags.insert(Tag::Markdown);
    }

    if let Some(stem) = path.file_stem()
        && EXPLORE_ALLOW_LIST
            .iter()
            .any(|name| stem.eq_ignore_ascii_case(name))
    {
        tags.insert(Tag::ExploreAllowed);
    }

    let segments: Vec<&OsStr> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect();

    if segments
        .iter()
        .any(|segment| segment.eq_ignore_ascii_case("tests") || segment.eq_ignore_ascii_case("test"))
    {
        tags.insert(Tag::TestDir);
    }
    if segments
        .iter()
        .any(|segment| segment.eq_ignore_ascii_case("temp"))
    {
        tags.insert(Tag::TempDir);
    }

    if let Some((last, ancestors)) = segments.split_last()
        && *last == "current_phase"
        && ancestors.iter().any(|segment| *segment == ".claude")
    {
        tags.insert(Tag::PhaseStateFile);
    }

    tags
}
