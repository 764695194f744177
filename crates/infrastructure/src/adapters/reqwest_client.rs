//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `ExchangeTransport` port. Each transport owns
//! its own cookie jar, so cookies set by the endpoint on one run never leak
//! into another.

use std::sync::Arc;
use std::time::Duration;

use debug1c_application::ports::{ExchangeTransport, TransportError, TransportFactory};
use debug1c_domain::Credentials;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use tracing::debug;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("Debug1C/", env!("CARGO_PKG_VERSION"));

/// Stateful HTTP transport for one exchange run.
///
/// Every request carries basic authentication, the jar's cookies and the
/// headers bound so far. Response bodies are returned for any status.
pub struct ReqwestTransport {
    client: Client,
    jar: Arc<Jar>,
    credentials: Credentials,
    headers: HeaderMap,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a transport with a fresh cookie jar.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(
        credentials: Credentials,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self {
            client,
            jar,
            credentials,
            headers: HeaderMap::new(),
            timeout,
        })
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(&self, error: &reqwest::Error, url: &Url) -> TransportError {
        let message = if error.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else if error.is_redirect() {
            "too many redirects".to_string()
        } else {
            error.to_string()
        };

        TransportError::Request {
            url: url.to_string(),
            message,
        }
    }
}

impl ExchangeTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .basic_auth(&self.credentials.login, Some(&self.credentials.password))
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| self.map_error(&e, url))?;

        debug!(%url, status = response.status().as_u16(), "Exchange response");

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request {
                url: url.to_string(),
                message: format!("failed to read body: {e}"),
            })?;

        Ok(body.to_vec())
    }

    fn cookie(&self, url: &Url, name: &str) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;

        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.to_string())
    }

    fn pin_cookie(&mut self, url: &Url, name: &str, value: &str) {
        self.jar
            .add_cookie_str(&format!("{name}={value}; Path=/"), url);
    }

    fn set_header(&mut self, name: &str, value: &str) -> Result<(), TransportError> {
        let invalid = |message: String| TransportError::InvalidHeader {
            name: name.to_string(),
            message,
        };

        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;

        self.headers.insert(header_name, header_value);
        Ok(())
    }
}

/// Builds a [`ReqwestTransport`] per run.
#[derive(Debug, Clone)]
pub struct ReqwestTransportFactory {
    timeout: Duration,
    user_agent: String,
}

impl ReqwestTransportFactory {
    /// Creates a factory with the given timeout and user agent.
    #[must_use]
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Self {
        Self {
            timeout,
            user_agent: user_agent.into(),
        }
    }
}

impl Default for ReqwestTransportFactory {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }
}

impl TransportFactory for ReqwestTransportFactory {
    type Transport = ReqwestTransport;

    fn create(&self, credentials: &Credentials) -> Result<ReqwestTransport, TransportError> {
        ReqwestTransport::new(credentials.clone(), self.timeout, &self.user_agent)
    }
}
