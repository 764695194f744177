//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the exchange core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod decoder;
mod file_system;
mod order_store;
mod site;
mod transport;

pub use clock::Clock;
pub use decoder::BodyDecoder;
pub use file_system::{FileSystem, FileSystemError};
pub use order_store::{OrderStore, OrderStoreError};
pub use site::{ArtifactPath, ExchangeSite};
pub use transport::{ExchangeTransport, TransportError, TransportFactory};
