use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::error::{FsError, FsResult, IoResultExt};
use super::fuzzy::partial_ratio;
use crate::types::{EntryKind, SearchResult};

/// Directory names never descended into during a search.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    ".cache",
    ".npm",
    ".cargo",
    "target",
    "build",
    "dist",
    "out",
    ".idea",
    ".vscode",
];

/// Hard ceiling on candidates collected per walk.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;
pub const MAX_LIMIT: usize = 100;
/// Candidates scoring below this are dropped.
pub const SCORE_CUTOFF: u8 = 40;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Clamped to `1..=MAX_LIMIT`.
    pub limit: usize,
    pub max_entries: usize,
    /// When set, symlinked directories are descended; the walker drops loops.
    pub follow_symlinks: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { limit: 20, max_entries: DEFAULT_MAX_ENTRIES, follow_symlinks: false }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    /// Candidates enumerated before scoring.
    pub scanned: usize,
    /// True when the walk stopped at `max_entries`.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
struct Candidate {
    relative: PathBuf,
    name: String,
    kind: EntryKind,
}

/// Whether a directory with this base name may be descended into.
pub fn is_traversable(name: &str) -> bool {
    !name.starts_with('.') && !SKIP_DIRS.contains(&name)
}

/// Fuzzy-searches the tree under `root` with default options.
pub fn search(query: &str, root: &Path, limit: usize) -> FsResult<Vec<SearchResult>> {
    let options = SearchOptions { limit, ..SearchOptions::default() };
    search_with(query, root, &options).map(|outcome| outcome.results)
}

/// Walks `root`, scores every base name against `query` and returns the best
/// matches, highest score first. Equal scores keep walk order.
pub fn search_with(query: &str, root: &Path, options: &SearchOptions) -> FsResult<SearchOutcome> {
    let meta = fs::metadata(root).at(root)?;
    if !meta.is_dir() {
        return Err(FsError::NotADirectory(root.to_path_buf()));
    }
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let limit = options.limit.clamp(1, MAX_LIMIT);

    let (candidates, truncated) = collect_candidates(&root, options.max_entries, options.follow_symlinks);

    let mut scored: Vec<(u8, usize)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(idx, c)| {
            let score = partial_ratio(query, &c.name);
            (score >= SCORE_CUTOFF).then_some((score, idx))
        })
        .collect();
    // sort_by is stable, ties stay in enumeration order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);

    let results = scored
        .into_iter()
        .map(|(score, idx)| {
            let c = &candidates[idx];
            SearchResult {
                name: c.name.clone(),
                path: root.join(&c.relative).to_string_lossy().into_owned(),
                relative_path: c.relative.to_string_lossy().into_owned(),
                score,
                kind: c.kind,
            }
        })
        .collect();

    tracing::debug!(
        "Search '{}' under {}: {} candidates{}",
        query,
        root.display(),
        candidates.len(),
        if truncated { " (capped)" } else { "" }
    );

    Ok(SearchOutcome { results, scanned: candidates.len(), truncated })
}

/// Depth-first walk. Hidden entries and skip-set directories are pruned
/// before descent, so their subtrees are never read.
fn collect_candidates(root: &Path, max_entries: usize, follow_symlinks: bool) -> (Vec<Candidate>, bool) {
    let walker = WalkDir::new(root)
        .follow_links(follow_symlinks)
        .sort_by(dirs_first)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || keep(e));

    let mut out = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("Search skipped an entry: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        if out.len() >= max_entries {
            return (out, true);
        }
        let relative = match entry.path().strip_prefix(root) {
            Ok(r) => r.to_path_buf(),
            Err(_) => continue,
        };
        out.push(Candidate {
            relative,
            name: entry.file_name().to_string_lossy().into_owned(),
            kind: kind_of(&entry),
        });
    }
    (out, false)
}

fn keep(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        is_traversable(&name)
    } else {
        !name.starts_with('.')
    }
}

/// Same order as a listing: directories first, then names case-insensitively.
fn dirs_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    let key = |e: &DirEntry| {
        let name = e.file_name().to_string_lossy().into_owned();
        (!e.file_type().is_dir(), name.to_lowercase(), name)
    };
    key(a).cmp(&key(b))
}

fn kind_of(entry: &DirEntry) -> EntryKind {
    let file_type = entry.file_type();
    let is_dir = if file_type.is_symlink() {
        // Unfollowed link: report what it points at
        fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false)
    } else {
        file_type.is_dir()
    };
    if is_dir {
        EntryKind::Directory
    } else {
        EntryKind::File
    }
}
