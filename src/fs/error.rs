use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error kinds produced by the filesystem engines.
///
/// Every variant is terminal and detected locally. The HTTP layer maps each
/// kind onto a status code in [`crate::error::AppError`].
#[derive(Debug, Error)]
pub enum FsError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("parent directory does not exist: {}", .0.display())]
    ParentNotFound(PathBuf),

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("target already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("destination lies inside the source: {}", .0.display())]
    DestinationInsideSource(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("too many copies of '{0}' in destination")]
    TooManyCopies(String),

    #[error("invalid search pattern: {0}")]
    InvalidPattern(String),

    #[error("trash operation failed: {0}")]
    Trash(String),

    #[error("i/o error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Classifies an OS error raised while operating on `path`.
    pub fn io(path: impl AsRef<Path>, err: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path),
            io::ErrorKind::NotFound => FsError::NotFound(path),
            _ => FsError::Io { path, source: err },
        }
    }
}

pub type FsResult<T> = Result<T, FsError>;

/// Attaches the offending path to an `io::Result`.
pub(crate) trait IoResultExt<T> {
    fn at(self, path: &Path) -> FsResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn at(self, path: &Path) -> FsResult<T> {
        self.map_err(|e| FsError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified_by_kind() {
        let denied = FsError::io("/x", io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert!(matches!(denied, FsError::PermissionDenied(p) if p == Path::new("/x")));

        let missing = FsError::io("/y", io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(missing, FsError::NotFound(_)));

        let other = FsError::io("/z", io::Error::new(io::ErrorKind::Other, "boom"));
        match other {
            FsError::Io { path, source } => {
                assert_eq!(path, PathBuf::from("/z"));
                assert_eq!(source.to_string(), "boom");
            }
            e => panic!("expected Io variant, got {e:?}"),
        }
    }

    #[test]
    fn display_mentions_the_path() {
        let err = FsError::AlreadyExists(PathBuf::from("/tmp/a"));
        assert_eq!(err.to_string(), "target already exists: /tmp/a");
    }
}
