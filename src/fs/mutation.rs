use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::error::{FsError, FsResult, IoResultExt};
use super::listing::read_entry;
use crate::types::Entry;

/// Upper bound on `name - Copy (n)` candidates tried before giving up.
pub const MAX_COPY_ATTEMPTS: u32 = 1000;

/// Rejects names that are empty, `.`/`..`, or would escape the parent directory.
pub fn validate_name(name: &str) -> FsResult<()> {
    if name.is_empty() {
        return Err(FsError::InvalidName("name cannot be empty".into()));
    }
    if name == "." || name == ".." {
        return Err(FsError::InvalidName(format!("'{}' is reserved", name)));
    }
    if name.contains('\0') {
        return Err(FsError::InvalidName("name contains a null byte".into()));
    }
    if name.contains('/') || (cfg!(windows) && name.contains('\\')) {
        return Err(FsError::InvalidName(format!("'{}' contains a path separator", name)));
    }
    Ok(())
}

/// Creates `parent/name` and returns its entry.
pub fn create_directory(parent: &Path, name: &str) -> FsResult<Entry> {
    validate_name(name)?;
    create_directory_at(&parent.join(name))
}

/// Creates the directory at `path`. The parent must already exist.
pub fn create_directory_at(path: &Path) -> FsResult<Entry> {
    // file_name() is None for roots and paths ending in `..`
    if path.file_name().map_or(true, |n| n.is_empty()) {
        return Err(FsError::InvalidName("directory name cannot be empty".into()));
    }
    if occupied(path) {
        return Err(FsError::AlreadyExists(path.to_path_buf()));
    }
    let parent = parent_of(path);
    if !parent.is_dir() {
        return Err(FsError::ParentNotFound(parent.to_path_buf()));
    }

    fs::create_dir(path).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path.to_path_buf()),
        _ => FsError::io(path, e),
    })?;
    tracing::debug!("Created directory {}", path.display());

    read_entry(path)
}

/// Renames `source` to `new_name` within its current parent directory.
///
/// Whether `a.txt` and `A.txt` collide depends on the filesystem.
pub fn rename(source: &Path, new_name: &str) -> FsResult<Entry> {
    validate_name(new_name)?;
    if !occupied(source) {
        return Err(FsError::NotFound(source.to_path_buf()));
    }
    let parent = source
        .parent()
        .ok_or_else(|| FsError::InvalidName(format!("cannot rename {}", source.display())))?;

    let target = parent.join(new_name);
    if occupied(&target) {
        return Err(FsError::AlreadyExists(target));
    }

    fs::rename(source, &target).at(source)?;
    tracing::debug!("Renamed {} -> {}", source.display(), target.display());

    read_entry(&target)
}

/// Deletes a file, symlink or a whole directory tree.
pub fn delete(path: &Path) -> FsResult<()> {
    let metadata = fs::symlink_metadata(path).at(path)?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        remove_symlink(path).at(path)?;
    } else if file_type.is_dir() {
        fs::remove_dir_all(path).at(path)?;
    } else {
        fs::remove_file(path).at(path)?;
    }
    tracing::debug!("Deleted {}", path.display());
    Ok(())
}

/// Copies `source` into `dest_dir`.
///
/// A name collision never fails the copy; the target is renamed to
/// `name - Copy.ext`, `name - Copy (2).ext`, ... instead.
pub fn copy(source: &Path, dest_dir: &Path) -> FsResult<Entry> {
    let source_meta = fs::metadata(source).at(source)?;
    ensure_dest_dir(dest_dir)?;
    let name = base_name(source)?;
    if source_meta.is_dir() {
        ensure_not_nested(source, dest_dir)?;
    }

    let mut target = dest_dir.join(&name);
    if occupied(&target) {
        target = generate_copy_name(dest_dir, &name, source_meta.is_dir())?;
    }

    if source_meta.is_dir() {
        copy_directory(source, &target)?;
    } else {
        copy_file(source, &target, &source_meta)?;
    }
    tracing::debug!("Copied {} -> {}", source.display(), target.display());

    read_entry(&target)
}

/// Moves `source` into `dest_dir`, keeping its name.
///
/// Unlike [`copy`], an existing `dest_dir/name` is a hard error.
pub fn move_entry(source: &Path, dest_dir: &Path) -> FsResult<Entry> {
    let source_meta = fs::symlink_metadata(source).at(source)?;
    ensure_dest_dir(dest_dir)?;
    let name = base_name(source)?;

    let target = dest_dir.join(&name);
    if occupied(&target) {
        return Err(FsError::AlreadyExists(target));
    }
    if source_meta.is_dir() {
        ensure_not_nested(source, dest_dir)?;
    }

    match fs::rename(source, &target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            return Err(FsError::PermissionDenied(source.to_path_buf()));
        }
        Err(e) => {
            // Usually a cross-device move
            tracing::info!("Rename failed for {} ({}), falling back to copy", source.display(), e.kind());
            let file_type = source_meta.file_type();
            if file_type.is_symlink() {
                copy_symlink(source, &target)?;
                remove_symlink(source).at(source)?;
            } else if file_type.is_dir() {
                copy_directory(source, &target)?;
                fs::remove_dir_all(source).at(source)?;
            } else {
                copy_file(source, &target, &source_meta)?;
                fs::remove_file(source).at(source)?;
            }
        }
    }
    tracing::debug!("Moved {} -> {}", source.display(), target.display());

    read_entry(&target)
}

/// Finds the first free `stem - Copy[ (n)]ext` name in `dest_dir`.
///
/// Directories never have an extension. For files the extension starts at the
/// last `.`, so `.bashrc` copies to ` - Copy.bashrc`.
pub fn generate_copy_name(dest_dir: &Path, source_name: &str, is_directory: bool) -> FsResult<PathBuf> {
    let (stem, ext) = match source_name.rfind('.') {
        Some(pos) if !is_directory => source_name.split_at(pos),
        _ => (source_name, ""),
    };

    let target = dest_dir.join(format!("{} - Copy{}", stem, ext));
    if !occupied(&target) {
        return Ok(target);
    }

    for n in 2..=MAX_COPY_ATTEMPTS {
        let target = dest_dir.join(format!("{} - Copy ({}){}", stem, n, ext));
        if !occupied(&target) {
            return Ok(target);
        }
    }

    Err(FsError::TooManyCopies(source_name.to_string()))
}

/// True if anything, including a dangling symlink, sits at `path`.
fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn base_name(path: &Path) -> FsResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| FsError::InvalidName(format!("{} has no final component", path.display())))
}

fn ensure_dest_dir(dest_dir: &Path) -> FsResult<()> {
    let meta = fs::metadata(dest_dir).at(dest_dir)?;
    if !meta.is_dir() {
        return Err(FsError::NotADirectory(dest_dir.to_path_buf()));
    }
    Ok(())
}

fn ensure_not_nested(source: &Path, dest_dir: &Path) -> FsResult<()> {
    let src = fs::canonicalize(source).at(source)?;
    let dst = fs::canonicalize(dest_dir).at(dest_dir)?;
    if dst.starts_with(&src) {
        return Err(FsError::DestinationInsideSource(dest_dir.to_path_buf()));
    }
    Ok(())
}

fn copy_file(source: &Path, target: &Path, source_meta: &Metadata) -> FsResult<u64> {
    let bytes = fs::copy(source, target).at(source)?;
    if let Ok(mtime) = source_meta.modified() {
        let applied = fs::File::options().write(true).open(target).and_then(|f| f.set_modified(mtime));
        if let Err(e) = applied {
            tracing::debug!("Could not preserve mtime on {} ({})", target.display(), e.kind());
        }
    }
    Ok(bytes)
}

fn copy_directory(source: &Path, target: &Path) -> FsResult<u64> {
    let mut bytes_copied = 0u64;
    fs::create_dir(target).at(target)?;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(walk_error)?;
        let rel = match entry.path().strip_prefix(source) {
            Ok(r) => r,
            Err(_) => continue,
        };
        let dest = target.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&dest).at(&dest)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest)?;
        } else {
            let meta = entry.metadata().map_err(walk_error)?;
            bytes_copied += copy_file(entry.path(), &dest, &meta)?;
        }
    }

    Ok(bytes_copied)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> FsResult<()> {
    let link = fs::read_link(source).at(source)?;
    std::os::unix::fs::symlink(&link, target).at(target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, _target: &Path) -> FsResult<()> {
    tracing::warn!("Symlink skipped during copy: {}", source.display());
    Ok(())
}

#[cfg(windows)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    // Directory symlinks on Windows must be removed with remove_dir
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(not(windows))]
fn remove_symlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

fn walk_error(err: walkdir::Error) -> FsError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    match err.into_io_error() {
        Some(io_err) => FsError::io(path, io_err),
        None => FsError::Io { path, source: io::Error::new(io::ErrorKind::Other, "filesystem loop detected") },
    }
}
