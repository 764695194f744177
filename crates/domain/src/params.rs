//! Inbound parameters and their normalized form.
//!
//! An exchange run starts from a flat string map. One key, `TYPE_MODE`,
//! holds a JSON object (`{"TYPE": .., "MODE": .., ...}`) whose fields are
//! merged over the flat map before anything else is read.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use url::Url;

use crate::error::{CredentialField, DomainError, DomainResult};
use crate::exchange::{ExchangeMode, ExchangeType};

/// Key holding the JSON-encoded type/mode object.
pub const TYPE_MODE_KEY: &str = "TYPE_MODE";
/// Key holding the optional exchange URL override.
pub const EXCHANGE_URL_KEY: &str = "EXCHANGE_URL";

const TYPE_KEY: &str = "TYPE";
const MODE_KEY: &str = "MODE";
const VERSION_KEY: &str = "VERSION";
const ORDER_ID_KEYS: [&str; 3] = ["ORDER_ID", "EXCHANGE_ORDER_ID", "QUERY_ORDER_ID"];

/// Flat inbound key/value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    values: BTreeMap<String, String>,
}

impl RawParameters {
    /// Creates an empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the parameter map for the unattended entry point.
    ///
    /// The type defaults to `catalog`; `work` becomes the mode.
    #[must_use]
    pub fn silence(exchange_type: Option<&str>, work: &str, exchange: Option<&str>) -> Self {
        let type_mode = serde_json::json!({
            TYPE_KEY: exchange_type.unwrap_or("catalog"),
            MODE_KEY: work,
        });

        let mut params = Self::new().with(TYPE_MODE_KEY, type_mode.to_string());
        if let Some(exchange) = exchange {
            params.insert(EXCHANGE_URL_KEY, exchange);
        }
        params
    }

    /// Adds a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Returns a value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns a value by key, treating the empty string as absent.
    #[must_use]
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// The exchange URL override, if one was given.
    #[must_use]
    pub fn exchange_url(&self) -> Option<&str> {
        self.non_empty(EXCHANGE_URL_KEY)
    }

    /// Decodes `TYPE_MODE` and merges its fields over this map.
    ///
    /// The payload is HTML-entity-unescaped before decoding. Scalar fields
    /// are merged as strings; nested arrays/objects and nulls are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTypeMode`] when the key is missing or
    /// empty, or when the payload is not a non-empty JSON object.
    pub fn merge_type_mode(mut self) -> DomainResult<Self> {
        let payload = self
            .non_empty(TYPE_MODE_KEY)
            .ok_or_else(|| DomainError::InvalidTypeMode("missing".to_string()))?;

        let decoded: Value = serde_json::from_str(&decode_html_entities(payload))
            .map_err(|e| DomainError::InvalidTypeMode(e.to_string()))?;

        let Value::Object(fields) = decoded else {
            return Err(DomainError::InvalidTypeMode(
                "expected a JSON object".to_string(),
            ));
        };
        if fields.is_empty() {
            return Err(DomainError::InvalidTypeMode("empty object".to_string()));
        }

        for (key, value) in fields {
            match value {
                Value::String(s) => self.insert(key, s),
                Value::Number(n) => self.insert(key, n.to_string()),
                Value::Bool(b) => self.insert(key, if b { "1" } else { "" }),
                Value::Null | Value::Array(_) | Value::Object(_) => {}
            }
        }

        Ok(self)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Decodes the entities `htmlspecialchars` produces.
///
/// `&amp;` is decoded last so that an escaped entity is only unescaped once.
#[must_use]
pub fn decode_html_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    Cow::Owned(
        input
            .replace("&quot;", "\"")
            .replace("&#039;", "'")
            .replace("&#39;", "'")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&"),
    )
}

/// Basic-auth credentials for the exchange endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login.
    pub login: String,
    /// Password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Checks both fields are non-empty, login first.
    ///
    /// # Errors
    ///
    /// Returns the first empty field.
    pub fn validate(&self) -> Result<(), CredentialField> {
        if self.login.is_empty() {
            return Err(CredentialField::Login);
        }
        if self.password.is_empty() {
            return Err(CredentialField::Password);
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"***")
            .finish()
    }
}

/// Normalized configuration for one exchange run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeParameters {
    /// Exchange type.
    pub exchange_type: ExchangeType,
    /// Exchange mode.
    pub mode: ExchangeMode,
    /// Resolved exchange endpoint.
    pub exchange_url: Url,
    /// Protocol version sent with `mode=init`.
    pub version: Option<String>,
    /// Positive order id, when one was supplied.
    pub order_id: Option<u64>,
    /// Endpoint credentials.
    pub credentials: Credentials,
}

impl ExchangeParameters {
    /// Builds the run parameters from a merged map and a resolved URL.
    #[must_use]
    pub fn from_merged(merged: &RawParameters, exchange_url: Url, credentials: Credentials) -> Self {
        Self {
            exchange_type: ExchangeType::parse(merged.get(TYPE_KEY).unwrap_or_default()),
            mode: ExchangeMode::parse(merged.get(MODE_KEY).unwrap_or_default()),
            exchange_url,
            version: merged.non_empty(VERSION_KEY).map(str::to_string),
            order_id: ORDER_ID_KEYS
                .iter()
                .find_map(|key| merged.non_empty(key))
                .and_then(parse_order_id),
            credentials,
        }
    }
}

fn parse_order_id(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn url() -> Url {
        Url::parse("http://shop.local/bitrix/admin/1c_exchange.php").expect("valid url")
    }

    #[test]
    fn test_merge_type_mode() {
        let merged = RawParameters::new()
            .with(TYPE_MODE_KEY, r#"{"TYPE":"sale","MODE":"query","VERSION":"2.09"}"#)
            .merge_type_mode()
            .expect("should decode");

        assert_eq!(merged.get("TYPE"), Some("sale"));
        assert_eq!(merged.get("MODE"), Some("query"));
        assert_eq!(merged.get("VERSION"), Some("2.09"));
    }

    #[test]
    fn test_merge_type_mode_html_escaped() {
        let merged = RawParameters::new()
            .with(
                TYPE_MODE_KEY,
                "{&quot;TYPE&quot;:&quot;catalog&quot;,&quot;MODE&quot;:&quot;import&quot;}",
            )
            .merge_type_mode()
            .expect("should decode");

        assert_eq!(merged.get("TYPE"), Some("catalog"));
        assert_eq!(merged.get("MODE"), Some("import"));
    }

    #[test]
    fn test_merge_overrides_flat_values() {
        let merged = RawParameters::new()
            .with("MODE", "info")
            .with(TYPE_MODE_KEY, r#"{"TYPE":"sale","MODE":"query","ORDER_ID":15}"#)
            .merge_type_mode()
            .expect("should decode");

        assert_eq!(merged.get("MODE"), Some("query"));
        assert_eq!(merged.get("ORDER_ID"), Some("15"));
    }

    #[test]
    fn test_merge_type_mode_rejects_bad_payloads() {
        let payloads = ["", "not json", "[]", "{}", "42", "\"sale\"", "{\"TYPE\":"];
        for payload in payloads {
            let result = RawParameters::new()
                .with(TYPE_MODE_KEY, payload)
                .merge_type_mode();
            assert!(
                matches!(result, Err(DomainError::InvalidTypeMode(_))),
                "payload {payload:?} should be rejected"
            );
        }

        assert!(RawParameters::new().merge_type_mode().is_err());
    }

    #[test]
    fn test_decode_html_entities_once() {
        assert_eq!(decode_html_entities("a &amp;quot; b"), "a &quot; b");
        assert_eq!(decode_html_entities("&lt;x&gt; &#039;y&#039;"), "<x> 'y'");
        assert!(matches!(decode_html_entities("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_silence_defaults_to_catalog() {
        let params = RawParameters::silence(None, "import", None)
            .merge_type_mode()
            .expect("should decode");

        assert_eq!(params.get("TYPE"), Some("catalog"));
        assert_eq!(params.get("MODE"), Some("import"));
        assert_eq!(params.exchange_url(), None);
    }

    #[test]
    fn test_silence_keeps_exchange_url() {
        let params = RawParameters::silence(Some("sale"), "info", Some("/custom/exchange.php"));
        assert_eq!(params.exchange_url(), Some("/custom/exchange.php"));
    }

    #[test]
    fn test_credentials_validate() {
        assert_eq!(Credentials::new("admin", "secret").validate(), Ok(()));
        assert_eq!(
            Credentials::new("", "secret").validate(),
            Err(CredentialField::Login)
        );
        assert_eq!(
            Credentials::new("admin", "").validate(),
            Err(CredentialField::Password)
        );
        assert_eq!(Credentials::new("", "").validate(), Err(CredentialField::Login));
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let debug = format!("{:?}", Credentials::new("admin", "secret"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_from_merged() {
        let merged = RawParameters::new()
            .with(TYPE_MODE_KEY, r#"{"TYPE":"sale","MODE":"exchange-order","EXCHANGE_ORDER_ID":"42"}"#)
            .merge_type_mode()
            .expect("should decode");

        let params = ExchangeParameters::from_merged(&merged, url(), Credentials::new("a", "b"));

        assert_eq!(params.exchange_type, ExchangeType::Sale);
        assert_eq!(params.mode, ExchangeMode::ExchangeOrder);
        assert_eq!(params.order_id, Some(42));
        assert_eq!(params.version, None);
    }

    #[test]
    fn test_order_id_must_be_positive() {
        for raw in ["0", "-3", "abc", ""] {
            let merged = RawParameters::new().with("ORDER_ID", raw);
            let params = ExchangeParameters::from_merged(&merged, url(), Credentials::new("a", "b"));
            assert_eq!(params.order_id, None, "raw id {raw:?}");
        }
    }
}
