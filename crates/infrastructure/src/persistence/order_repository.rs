//! File-based order store.
//!
//! Orders live in a single JSON file holding an array of orders:
//! ```text
//! [
//!   { "id": 42, "fields": { "UPDATED_1C": "Y" } }
//! ]
//! ```
//! A missing file is an empty store.

use std::path::PathBuf;

use async_trait::async_trait;
use debug1c_application::ports::{FileSystem, FileSystemError, OrderStore, OrderStoreError};
use debug1c_domain::Order;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Converts `FileSystemError` to `std::io::Error` for `OrderStoreError`.
fn to_io_error(e: FileSystemError) -> std::io::Error {
    match e {
        FileSystemError::Io(io_err) => io_err,
        FileSystemError::NotFound(path) => {
            std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string())
        }
        FileSystemError::PermissionDenied(path) => std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            path.display().to_string(),
        ),
        FileSystemError::NotADirectory(path) => std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            path.display().to_string(),
        ),
    }
}

/// JSON file order store.
#[derive(Debug, Clone)]
pub struct JsonOrderStore<F> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> JsonOrderStore<F> {
    /// Creates a store backed by the file at `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
        }
    }

    async fn load_all(&self) -> Result<Vec<Order>, OrderStoreError> {
        if !self.fs.exists(&self.path).await {
            debug!(path = %self.path.display(), "Order store file missing, treating as empty");
            return Ok(Vec::new());
        }

        let content = self.fs.read_file(&self.path).await.map_err(to_io_error)?;
        from_json_bytes(&content).map_err(|e| OrderStoreError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl<F: FileSystem> OrderStore for JsonOrderStore<F> {
    async fn load(&self, id: u64) -> Result<Option<Order>, OrderStoreError> {
        let orders = self.load_all().await?;
        Ok(orders.into_iter().find(|order| order.id == id))
    }

    async fn save(&self, order: &Order) -> Result<(), OrderStoreError> {
        let mut orders = self.load_all().await?;

        let Some(existing) = orders.iter_mut().find(|o| o.id == order.id) else {
            return Err(OrderStoreError::Rejected(
                order.id,
                "no such order".to_string(),
            ));
        };
        existing.clone_from(order);

        let content = to_json_stable_bytes(&orders)
            .map_err(|e| OrderStoreError::Serialization(e.to_string()))?;
        self.fs
            .write_file(&self.path, &content)
            .await
            .map_err(to_io_error)?;
        Ok(())
    }
}
