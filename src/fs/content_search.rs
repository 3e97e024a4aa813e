use std::fs;
use std::io;
use std::path::Path;

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use grep_searcher::{sinks::UTF8, BinaryDetection, Searcher, SearcherBuilder};
use ignore::WalkBuilder;

use super::error::{FsError, FsResult, IoResultExt};
use super::search::is_traversable;
use crate::types::{ContentMatch, ContentSearchResult};

pub const DEFAULT_MAX_RESULTS: usize = 100;
/// Hard ceiling on matches returned by one search.
pub const MAX_RESULTS: usize = 1000;

/// Extensions treated as binary without opening the file.
const BINARY_EXTENSIONS: &[&str] = &[
    "exe", "dll", "so", "dylib", "bin", "o", "a", "lib", "obj", "class", "jar", "war", "ear", "zip", "tar", "gz",
    "bz2", "xz", "7z", "rar", "iso", "dmg", "img", "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods",
    "odp", "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp", "mp3", "mp4", "avi", "mkv", "mov", "wmv", "flv",
    "wav", "flac", "ogg", "woff", "woff2", "ttf", "otf", "eot", "pyc", "pyo", "wasm", "node",
];

#[derive(Debug, Clone)]
pub struct ContentSearchOptions {
    pub case_sensitive: bool,
    /// Treat the query as a regular expression instead of literal text.
    pub regex: bool,
    /// Clamped to `1..=MAX_RESULTS`.
    pub max_results: usize,
}

impl Default for ContentSearchOptions {
    fn default() -> Self {
        Self { case_sensitive: false, regex: false, max_results: DEFAULT_MAX_RESULTS }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentSearchOutcome {
    /// One entry per file with at least one match, in walk order.
    pub results: Vec<ContentSearchResult>,
    pub files_searched: usize,
    pub total_matches: usize,
    /// True when the match cap was reached; more matches may exist.
    pub truncated: bool,
}

/// True when the extension marks a file not worth scanning for text.
pub fn is_binary_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| BINARY_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// Searches file contents under `root` line by line.
///
/// Hidden entries, skip-set directories and anything excluded by
/// `.gitignore`, `.git/info/exclude` or the global git excludes are not
/// visited. Binary files are skipped by extension, and a file that turns out
/// to contain a NUL byte stops being read at that point. Files that cannot be
/// read or are not valid UTF-8 are skipped silently.
///
/// Matching stops once `max_results` matches have been collected, including
/// in the middle of a file.
pub fn content_search(query: &str, root: &Path, options: &ContentSearchOptions) -> FsResult<ContentSearchOutcome> {
    let meta = fs::metadata(root).at(root)?;
    if !meta.is_dir() {
        return Err(FsError::NotADirectory(root.to_path_buf()));
    }
    let matcher = build_matcher(query, options)?;
    let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
    let cap = options.max_results.clamp(1, MAX_RESULTS);

    let mut searcher =
        SearcherBuilder::new().binary_detection(BinaryDetection::quit(b'\x00')).line_number(true).build();

    let walker = WalkBuilder::new(&root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .require_git(false)
        .follow_links(false)
        .filter_entry(|e| {
            let is_dir = e.file_type().is_some_and(|t| t.is_dir());
            e.depth() == 0 || !is_dir || is_traversable(&e.file_name().to_string_lossy())
        })
        .build();

    let mut outcome = ContentSearchOutcome::default();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) || is_binary_file(entry.path()) {
            continue;
        }
        if outcome.total_matches >= cap {
            outcome.truncated = true;
            break;
        }

        let budget = cap - outcome.total_matches;
        let matches = match search_file(&mut searcher, &matcher, entry.path(), budget) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::debug!("Skipping {}: {}", entry.path().display(), err);
                continue;
            }
        };
        outcome.files_searched += 1;
        if matches.is_empty() {
            continue;
        }

        outcome.total_matches += matches.len();
        if outcome.total_matches >= cap {
            outcome.truncated = true;
        }
        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        outcome.results.push(ContentSearchResult {
            path: entry.path().to_string_lossy().into_owned(),
            relative_path: relative.to_string_lossy().into_owned(),
            matches,
        });
    }

    tracing::debug!(
        "Content search '{}' under {}: {} matches in {} files",
        query,
        root.display(),
        outcome.total_matches,
        outcome.files_searched
    );

    Ok(outcome)
}

fn build_matcher(query: &str, options: &ContentSearchOptions) -> FsResult<RegexMatcher> {
    if query.is_empty() {
        return Err(FsError::InvalidPattern("search query cannot be empty".into()));
    }
    let pattern = if options.regex { query.to_string() } else { regex::escape(query) };

    RegexMatcherBuilder::new()
        .case_insensitive(!options.case_sensitive)
        .line_terminator(Some(b'\n'))
        .build(&pattern)
        .map_err(|e| FsError::InvalidPattern(e.to_string()))
}

/// Collects up to `budget` matches from one file. Every match on a line is
/// reported separately.
fn search_file(
    searcher: &mut Searcher,
    matcher: &RegexMatcher,
    path: &Path,
    budget: usize,
) -> io::Result<Vec<ContentMatch>> {
    let mut matches = Vec::new();

    searcher.search_path(
        matcher,
        path,
        UTF8(|line_number, line| {
            let bytes = line.as_bytes();
            let mut offset = 0;
            while let Ok(Some(m)) = matcher.find(&bytes[offset..]) {
                let start = offset + m.start();
                let end = offset + m.end();
                matches.push(ContentMatch {
                    line_number,
                    column: start + 1,
                    line_content: line.trim_end().to_string(),
                    match_start: start,
                    match_end: end,
                });
                if matches.len() >= budget {
                    return Ok(false);
                }

                // empty matches would never advance
                offset = if end > start { end } else { end + 1 };
                if offset >= bytes.len() {
                    break;
                }
            }
            Ok(true)
        }),
    )?;

    Ok(matches)
}
