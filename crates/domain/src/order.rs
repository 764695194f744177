//! Local order entity, as far as the exchange debugger touches it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field marking whether an order has been sent to 1C.
pub const UPDATED_1C_FIELD: &str = "UPDATED_1C";

/// Value of [`UPDATED_1C_FIELD`] for an order that still has to be sent.
pub const NOT_UPDATED: &str = "N";

/// A stored order: an id plus its named fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: u64,
    /// Order fields.
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl Order {
    /// Creates an order with no fields.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    /// Returns a field value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Sets a field value.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Flags the order to be picked up again by the next sale exchange.
    pub fn mark_not_updated(&mut self) {
        self.set_field(UPDATED_1C_FIELD, NOT_UPDATED);
    }
}
