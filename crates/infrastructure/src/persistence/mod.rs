//! Persistence adapters.
//!
//! Implementations of the file-backed ports: the real file system and the
//! JSON order store.

mod file_system;
mod order_repository;

pub use file_system::TokioFileSystem;
pub use order_repository::JsonOrderStore;
