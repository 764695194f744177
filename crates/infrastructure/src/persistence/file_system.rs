//! Real file system implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use debug1c_application::ports::{FileSystem, FileSystemError};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn map_io_error(e: std::io::Error, path: &Path) -> FileSystemError {
    match e.kind() {
        ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        ErrorKind::NotADirectory => FileSystemError::NotADirectory(path.to_path_buf()),
        _ => FileSystemError::Io(e),
    }
}

async fn ensure_parent(path: &Path) -> Result<(), FileSystemError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| map_io_error(e, parent))?;
    }
    Ok(())
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| map_io_error(e, path))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        ensure_parent(path).await?;
        fs::write(path, contents)
            .await
            .map_err(|e| map_io_error(e, path))
    }

    async fn append_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        ensure_parent(path).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| map_io_error(e, path))?;
        file.write_all(contents).await?;
        file.flush().await?;
        Ok(())
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| map_io_error(e, path))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }

    async fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_dir())
    }

    async fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_file())
    }

    async fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, FileSystemError> {
        let mut entries = Vec::new();
        let mut dir = fs::read_dir(path)
            .await
            .map_err(|e| map_io_error(e, path))?;

        while let Some(entry) = dir.next_entry().await? {
            entries.push(entry.path());
        }

        entries.sort(); // Deterministic ordering
        Ok(entries)
    }
}
