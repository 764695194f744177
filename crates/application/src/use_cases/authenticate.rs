//! Session authentication use case.
//!
//! `Unauthenticated -> Authenticated | Failed`. The check-auth reply is plain
//! text; the session id is cut out of it with [`extract_sessid`].

use debug1c_domain::{
    ExchangeError, ExchangeParameters, ExchangeRequest, LogEvent, Session, extract_sessid,
};
use tracing::warn;

use super::fetch::fetch;
use crate::ports::{BodyDecoder, ExchangeTransport, FileSystem};
use crate::run_log::RunLog;

/// Performs the check-auth handshake and binds the session id header.
pub struct Authenticate<'a> {
    decoder: &'a dyn BodyDecoder,
    csrf_header: &'a str,
}

impl<'a> Authenticate<'a> {
    /// Creates a new `Authenticate` use case.
    #[must_use]
    pub const fn new(decoder: &'a dyn BodyDecoder, csrf_header: &'a str) -> Self {
        Self {
            decoder,
            csrf_header,
        }
    }

    /// Runs `mode=checkauth` and authenticates `session` on success.
    ///
    /// # Errors
    /// - [`ExchangeError::HttpClientAuthError`] if the reply carries no session id
    ///   or the id cannot be sent as a header
    /// - [`ExchangeError::Transport`] if the request fails
    pub async fn execute<T, F>(
        &self,
        transport: &mut T,
        params: &ExchangeParameters,
        session: &mut Session,
        log: &mut RunLog<F>,
    ) -> Result<(), ExchangeError>
    where
        T: ExchangeTransport,
        F: FileSystem,
    {
        let request = ExchangeRequest::checkauth(&params.exchange_type);
        let url = request.to_url(&params.exchange_url);
        let body = fetch(transport, &url, request.mode(), log).await?;
        let text = self.decoder.decode(&body);

        let bound = extract_sessid(&text).map(|sessid| {
            transport
                .set_header(self.csrf_header, sessid)
                .map(|()| sessid.to_string())
        });

        match bound {
            Some(Ok(sessid)) => {
                session.authenticate(sessid);
                log.record(&LogEvent::AuthSuccess).await;
                Ok(())
            }
            Some(Err(e)) => {
                warn!(error = %e, "Session id rejected as header value");
                log.record(&LogEvent::AuthError).await;
                Err(ExchangeError::HttpClientAuthError)
            }
            None => {
                log.record(&LogEvent::AuthError).await;
                Err(ExchangeError::HttpClientAuthError)
            }
        }
    }
}
