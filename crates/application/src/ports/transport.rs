//! Transport port for talking to the exchange endpoint.

use std::future::Future;

use debug1c_domain::Credentials;
use url::Url;

/// Errors raised by a transport.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    /// The client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// A request could not be completed.
    #[error("request to {url} failed: {message}")]
    Request {
        /// Requested URL.
        url: String,
        /// Underlying error text.
        message: String,
    },

    /// A header name or value is not valid on the wire.
    #[error("invalid header {name}: {message}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Underlying error text.
        message: String,
    },
}

/// A stateful HTTP client bound to one set of credentials.
///
/// Every request carries basic authentication, the cookies collected or
/// pinned so far, and any header bound with [`ExchangeTransport::set_header`].
pub trait ExchangeTransport: Send + Sync {
    /// Issues a GET request and returns the raw body, whatever the status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be completed.
    fn get(&self, url: &Url) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;

    /// Returns a cookie the transport would send to `url`.
    fn cookie(&self, url: &Url, name: &str) -> Option<String>;

    /// Pins a cookie for all later requests to `url`'s site.
    fn pin_cookie(&mut self, url: &Url, name: &str, value: &str);

    /// Binds a header to all later requests, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or value cannot be sent.
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError>;
}

/// Builds a fresh transport per run.
pub trait TransportFactory: Send + Sync {
    /// The transport type produced.
    type Transport: ExchangeTransport;

    /// Creates a transport that authenticates with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built.
    fn create(&self, credentials: &Credentials) -> Result<Self::Transport, TransportError>;
}
