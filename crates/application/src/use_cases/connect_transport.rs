//! Transport construction use case.

use debug1c_domain::{ExchangeError, ExchangeParameters, LogEvent, Session};
use tracing::{debug, warn};

use super::fetch::fetch;
use crate::ports::{ExchangeTransport, FileSystem, TransportFactory};
use crate::run_log::RunLog;
use crate::settings::DriverSettings;

/// Builds the per-run transport and harvests the session cookie.
///
/// The endpoint only hands out its session cookie on a plain GET, so this
/// step issues one throwaway request against the exchange URL and discards
/// the body.
pub struct ConnectTransport<'a, TF> {
    factory: &'a TF,
    settings: &'a DriverSettings,
}

impl<'a, TF: TransportFactory> ConnectTransport<'a, TF> {
    /// Creates a new `ConnectTransport` use case.
    #[must_use]
    pub const fn new(factory: &'a TF, settings: &'a DriverSettings) -> Self {
        Self { factory, settings }
    }

    /// Validates credentials, builds the transport and pins the session cookie.
    ///
    /// # Errors
    /// - [`ExchangeError::EmptyParam`] if login or password is empty; nothing is sent
    /// - [`ExchangeError::HttpClientCreateError`] if the client cannot be built or
    ///   the probe returns no session cookie
    /// - [`ExchangeError::Transport`] if the probe request fails
    pub async fn execute<F: FileSystem>(
        &self,
        params: &ExchangeParameters,
        log: &mut RunLog<F>,
    ) -> Result<(TF::Transport, Session), ExchangeError> {
        if let Err(param) = params.credentials.validate() {
            log.record(&LogEvent::EmptyParam {
                param: param.to_string(),
            })
            .await;
            return Err(ExchangeError::EmptyParam { param });
        }

        let mut transport = match self.factory.create(&params.credentials) {
            Ok(transport) => transport,
            Err(e) => {
                warn!(error = %e, "Failed to build transport");
                log.record(&LogEvent::HttpClientCreateError).await;
                return Err(ExchangeError::HttpClientCreateError);
            }
        };

        let url = &params.exchange_url;
        fetch(&transport, url, "probe", log).await?;

        let Some(session_id) = transport.cookie(url, &self.settings.session_cookie) else {
            log.record(&LogEvent::HttpClientCreateError).await;
            return Err(ExchangeError::HttpClientCreateError);
        };
        debug!(cookie = %self.settings.session_cookie, "Session cookie harvested");

        transport.pin_cookie(url, &self.settings.session_cookie, &session_id);
        if let Some(debug_cookie) = &self.settings.debug_cookie {
            transport.pin_cookie(url, &debug_cookie.name, &debug_cookie.value);
        }

        let mut session = Session::new();
        session.set_cookie_session_id(session_id);
        Ok((transport, session))
    }
}
