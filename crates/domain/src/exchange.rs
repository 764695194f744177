//! Exchange vocabulary and flow routing.
//!
//! The remote endpoint understands a fixed set of exchange types and modes.
//! Values outside that vocabulary are kept verbatim so they can still be sent
//! on the wire, but they never select a flow on their own.

use std::fmt;

/// Top-level exchange category (`type=` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExchangeType {
    /// Product catalog exchange.
    Catalog,
    /// Orders exchange.
    Sale,
    /// Reference books (highload blocks).
    Reference,
    /// Anything else the caller supplied.
    Other(String),
}

impl ExchangeType {
    /// Parses a wire value. Unknown values become [`ExchangeType::Other`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "catalog" => Self::Catalog,
            "sale" => Self::Sale,
            "reference" => Self::Reference,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Catalog => "catalog",
            Self::Sale => "sale",
            Self::Reference => "reference",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ExchangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation within an exchange type (`mode=` on the wire).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExchangeMode {
    /// Upload a previously placed file.
    Import,
    /// Fetch orders.
    Query,
    /// Fetch endpoint information.
    Info,
    /// Reset the "sent to 1C" flag of an order.
    ExchangeOrder,
    /// Anything else the caller supplied, including the empty string.
    Other(String),
}

impl ExchangeMode {
    /// Parses a wire value. Unknown values become [`ExchangeMode::Other`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "import" => Self::Import,
            "query" => Self::Query,
            "info" => Self::Info,
            "exchange-order" => Self::ExchangeOrder,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Import => "import",
            Self::Query => "query",
            Self::Info => "info",
            Self::ExchangeOrder => "exchange-order",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for ExchangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upload directory an import file is picked from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadArea {
    /// `1c_catalog`
    Catalog,
    /// `1c_exchange`
    SaleExchange,
    /// `1c_highloadblock`
    Reference,
}

impl UploadArea {
    /// Directory name under the upload root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Catalog => "1c_catalog",
            Self::SaleExchange => "1c_exchange",
            Self::Reference => "1c_highloadblock",
        }
    }
}

/// A fixed request sequence selected by a (type, mode) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Locate the newest XML file in the area and import it.
    Import(UploadArea),
    /// `mode=init` followed by `mode=query`.
    InitThenQuery,
    /// `mode=info`.
    Info,
    /// Reset the acknowledgement flag of a local order.
    OrderAcknowledge,
}

#[derive(Debug, Clone, Copy)]
enum TypeKey {
    Catalog,
    Sale,
    Reference,
}

impl TypeKey {
    fn matches(self, exchange_type: &ExchangeType) -> bool {
        matches!(
            (self, exchange_type),
            (Self::Catalog, ExchangeType::Catalog)
                | (Self::Sale, ExchangeType::Sale)
                | (Self::Reference, ExchangeType::Reference)
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum ModeKey {
    Any,
    Import,
    Query,
    Info,
    ExchangeOrder,
}

impl ModeKey {
    fn matches(self, mode: &ExchangeMode) -> bool {
        matches!(
            (self, mode),
            (Self::Any, _)
                | (Self::Import, ExchangeMode::Import)
                | (Self::Query, ExchangeMode::Query)
                | (Self::Info, ExchangeMode::Info)
                | (Self::ExchangeOrder, ExchangeMode::ExchangeOrder)
        )
    }
}

const ROUTES: &[(TypeKey, ModeKey, Flow)] = &[
    (
        TypeKey::Catalog,
        ModeKey::Import,
        Flow::Import(UploadArea::Catalog),
    ),
    (
        TypeKey::Sale,
        ModeKey::Import,
        Flow::Import(UploadArea::SaleExchange),
    ),
    (TypeKey::Sale, ModeKey::Query, Flow::InitThenQuery),
    (TypeKey::Sale, ModeKey::Info, Flow::Info),
    (TypeKey::Sale, ModeKey::ExchangeOrder, Flow::OrderAcknowledge),
    (
        TypeKey::Reference,
        ModeKey::Any,
        Flow::Import(UploadArea::Reference),
    ),
];

/// Looks up the flow for a (type, mode) pair.
///
/// Returns `None` for pairs outside the table; callers treat that as a
/// silent no-op.
#[must_use]
pub fn route(exchange_type: &ExchangeType, mode: &ExchangeMode) -> Option<Flow> {
    ROUTES
        .iter()
        .find(|(type_key, mode_key, _)| type_key.matches(exchange_type) && mode_key.matches(mode))
        .map(|&(_, _, flow)| flow)
}
