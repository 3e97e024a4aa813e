use std::io;
use std::path::{Path, PathBuf};

use super::error::{FsError, FsResult};

/// Opens `path` with the desktop's default application without waiting for it.
pub fn open_path(path: &Path) -> FsResult<()> {
    if !path.exists() {
        return Err(FsError::NotFound(path.to_path_buf()));
    }
    open::that_detached(path).map_err(|e| FsError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(e.kind(), format!("failed to launch default application: {}", e)),
    })?;
    tracing::debug!("Opened {} with the default application", path.display());
    Ok(())
}

/// Moves every path to the system trash. Nothing is trashed unless all exist.
pub fn move_to_trash(paths: &[PathBuf]) -> FsResult<()> {
    if let Some(missing) = paths.iter().find(|p| p.symlink_metadata().is_err()) {
        return Err(FsError::NotFound(missing.clone()));
    }
    trash::delete_all(paths).map_err(|e| FsError::Trash(e.to_string()))?;
    tracing::debug!("Moved {} item(s) to trash", paths.len());
    Ok(())
}

pub fn home_directory() -> FsResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| FsError::NotFound(PathBuf::from("~")))
}
