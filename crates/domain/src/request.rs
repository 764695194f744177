//! Outbound request contract.
//!
//! Every call to the exchange endpoint is a GET with a query string appended
//! to the resolved exchange URL. The parameter order below is the order the
//! endpoint has always received them in.

use url::Url;

use crate::exchange::{ExchangeMode, ExchangeType};

/// One outbound GET request, described by its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    query: Vec<(&'static str, String)>,
}

impl ExchangeRequest {
    /// `?type=<T>&mode=checkauth`
    #[must_use]
    pub fn checkauth(exchange_type: &ExchangeType) -> Self {
        Self {
            query: vec![
                ("type", exchange_type.as_str().to_string()),
                ("mode", "checkauth".to_string()),
            ],
        }
    }

    /// `?type=<T>&mode=init&sessid=<S>&version=<V?>`
    #[must_use]
    pub fn init(exchange_type: &ExchangeType, sessid: &str, version: Option<&str>) -> Self {
        Self {
            query: vec![
                ("type", exchange_type.as_str().to_string()),
                ("mode", "init".to_string()),
                ("sessid", sessid.to_string()),
                ("version", version.unwrap_or_default().to_string()),
            ],
        }
    }

    /// `?type=<T>&mode=<M>&sessid=<S>&filename=<F>`
    #[must_use]
    pub fn import(
        exchange_type: &ExchangeType,
        mode: &ExchangeMode,
        sessid: &str,
        filename: &str,
    ) -> Self {
        Self {
            query: vec![
                ("type", exchange_type.as_str().to_string()),
                ("mode", mode.as_str().to_string()),
                ("sessid", sessid.to_string()),
                ("filename", filename.to_string()),
            ],
        }
    }

    /// `?type=sale&mode=query&sessid=<S>&orderId=<ID?>`
    #[must_use]
    pub fn query(sessid: &str, order_id: Option<u64>) -> Self {
        Self {
            query: vec![
                ("type", ExchangeType::Sale.as_str().to_string()),
                ("mode", ExchangeMode::Query.as_str().to_string()),
                ("sessid", sessid.to_string()),
                (
                    "orderId",
                    order_id.map(|id| id.to_string()).unwrap_or_default(),
                ),
            ],
        }
    }

    /// `?type=sale&mode=info&sessid=<S>`
    #[must_use]
    pub fn info(sessid: &str) -> Self {
        Self {
            query: vec![
                ("type", ExchangeType::Sale.as_str().to_string()),
                ("mode", ExchangeMode::Info.as_str().to_string()),
                ("sessid", sessid.to_string()),
            ],
        }
    }

    /// The query parameters, in wire order.
    #[must_use]
    pub fn query_pairs(&self) -> &[(&'static str, String)] {
        &self.query
    }

    /// Value of the `mode` parameter.
    #[must_use]
    pub fn mode(&self) -> &str {
        self.query
            .iter()
            .find(|(key, _)| *key == "mode")
            .map_or("", |(_, value)| value.as_str())
    }

    /// Builds the full request URL against an exchange endpoint.
    ///
    /// Any query the endpoint URL already carries is replaced.
    #[must_use]
    pub fn to_url(&self, exchange_url: &Url) -> Url {
        let mut url = exchange_url.clone();
        url.set_query(None);
        url.query_pairs_mut()
            .extend_pairs(self.query.iter().map(|(k, v)| (*k, v.as_str())));
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn endpoint() -> Url {
        Url::parse("http://shop.local/bitrix/admin/1c_exchange.php").expect("valid url")
    }

    #[test]
    fn test_checkauth_url() {
        let url = ExchangeRequest::checkauth(&ExchangeType::Catalog).to_url(&endpoint());
        assert_eq!(
            url.as_str(),
            "http://shop.local/bitrix/admin/1c_exchange.php?type=catalog&mode=checkauth"
        );
    }

    #[test]
    fn test_init_url_without_version() {
        let url = ExchangeRequest::init(&ExchangeType::Sale, "abc", None).to_url(&endpoint());
        assert_eq!(url.query(), Some("type=sale&mode=init&sessid=abc&version="));
    }

    #[test]
    fn test_init_url_with_version() {
        let url =
            ExchangeRequest::init(&ExchangeType::Sale, "abc", Some("2.09")).to_url(&endpoint());
        assert_eq!(
            url.query(),
            Some("type=sale&mode=init&sessid=abc&version=2.09")
        );
    }

    #[test]
    fn test_import_url() {
        let request = ExchangeRequest::import(
            &ExchangeType::Catalog,
            &ExchangeMode::Import,
            "abc",
            "import0_1.xml",
        );
        assert_eq!(request.mode(), "import");
        assert_eq!(
            request.to_url(&endpoint()).query(),
            Some("type=catalog&mode=import&sessid=abc&filename=import0_1.xml")
        );
    }

    #[test]
    fn test_query_url_is_always_sale_query() {
        let url = ExchangeRequest::query("abc", Some(17)).to_url(&endpoint());
        assert_eq!(url.query(), Some("type=sale&mode=query&sessid=abc&orderId=17"));

        let url = ExchangeRequest::query("abc", None).to_url(&endpoint());
        assert_eq!(url.query(), Some("type=sale&mode=query&sessid=abc&orderId="));
    }

    #[test]
    fn test_info_url() {
        let url = ExchangeRequest::info("abc").to_url(&endpoint());
        assert_eq!(url.query(), Some("type=sale&mode=info&sessid=abc"));
    }

    #[test]
    fn test_existing_query_is_replaced() {
        let endpoint = Url::parse("http://shop.local/exchange.php?debug=1").expect("valid url");
        let url = ExchangeRequest::info("abc").to_url(&endpoint);
        assert_eq!(url.query(), Some("type=sale&mode=info&sessid=abc"));
    }
}
