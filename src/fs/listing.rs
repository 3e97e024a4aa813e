use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::error::{FsError, FsResult, IoResultExt};
use crate::types::{Entry, EntryKind};

/// Lists the immediate children of `path`.
///
/// Directories come before files; each group is ordered case-insensitively by
/// name. Children that cannot be stat'ed (permissions, dangling symlinks,
/// entries vanishing mid-read) are skipped instead of failing the listing.
pub fn list_directory(path: &Path) -> FsResult<Vec<Entry>> {
    if !path.is_dir() {
        return Err(FsError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = fs::read_dir(path).at(path)?;
    let mut entries = Vec::new();

    for child in read_dir {
        let child = match child {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", path.display(), e);
                continue;
            }
        };
        let child_path = child.path();
        // fs::metadata follows symlinks, so a link to a directory lists as a directory.
        match fs::metadata(&child_path) {
            Ok(md) => entries.push(entry_from_metadata(&child_path, &md)),
            Err(e) => {
                tracing::debug!("Skipping {} ({})", child_path.display(), e.kind());
            }
        }
    }

    sort_entries(&mut entries);
    Ok(entries)
}

/// Builds a fresh [`Entry`] for `path`, following symlinks. A dangling link
/// is described by the link itself.
pub fn read_entry(path: &Path) -> FsResult<Entry> {
    let metadata = fs::metadata(path).or_else(|_| fs::symlink_metadata(path)).at(path)?;
    Ok(entry_from_metadata(path, &metadata))
}

pub(crate) fn entry_from_metadata(path: &Path, metadata: &Metadata) -> Entry {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let name = abs
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| abs.to_string_lossy().into_owned());

    let kind = if metadata.is_dir() { EntryKind::Directory } else { EntryKind::File };
    let size = if kind.is_dir() { 0 } else { metadata.len() };
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    Entry {
        name,
        path: abs.to_string_lossy().into_owned(),
        kind,
        size,
        modified: DateTime::<Utc>::from(modified),
    }
}

/// Directories first, then case-insensitive name order. Names that only
/// differ in case fall back to byte order so the result is deterministic.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(|e| (!e.kind.is_dir(), e.name.to_lowercase(), e.name.clone()));
}
