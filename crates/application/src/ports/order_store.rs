//! Order store port

use async_trait::async_trait;
use debug1c_domain::Order;

/// Errors that can occur during order operations.
#[derive(Debug, thiserror::Error)]
pub enum OrderStoreError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The order was rejected by the store.
    #[error("Order {0} rejected: {1}")]
    Rejected(u64, String),
}

/// Access to the site's orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Loads an order by id.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn load(&self, id: u64) -> Result<Option<Order>, OrderStoreError>;

    /// Persists an order.
    ///
    /// # Errors
    /// Returns an error if the order cannot be written.
    async fn save(&self, order: &Order) -> Result<(), OrderStoreError>;
}
