//! Resolve parameters use case.

use debug1c_domain::{Credentials, ExchangeError, ExchangeParameters, LogEvent, RawParameters};
use tracing::debug;

use crate::ports::{ExchangeSite, FileSystem};
use crate::run_log::RunLog;

/// Turns inbound key/value pairs into [`ExchangeParameters`].
///
/// Failures are logged and returned as the single error of the run; no
/// request is sent when this step fails.
pub struct ResolveParameters<'a> {
    site: &'a dyn ExchangeSite,
}

impl<'a> ResolveParameters<'a> {
    /// Creates a new `ResolveParameters` use case.
    #[must_use]
    pub const fn new(site: &'a dyn ExchangeSite) -> Self {
        Self { site }
    }

    /// Decodes the type/mode payload and resolves the exchange URL.
    ///
    /// # Errors
    /// - [`ExchangeError::ModeNotSelected`] if `TYPE_MODE` is missing or undecodable
    /// - [`ExchangeError::FileNotExist`] if the exchange URL does not resolve
    pub async fn execute<F: FileSystem>(
        &self,
        raw: RawParameters,
        credentials: Credentials,
        log: &mut RunLog<F>,
    ) -> Result<ExchangeParameters, ExchangeError> {
        let merged = match raw.merge_type_mode() {
            Ok(merged) => merged,
            Err(e) => {
                debug!(error = %e, "Type/mode payload rejected");
                log.record(&LogEvent::ModeNotSelected).await;
                return Err(ExchangeError::ModeNotSelected);
            }
        };

        let requested = merged.exchange_url();
        let Some(exchange_url) = self.site.resolve_exchange_url(requested).await else {
            let file = requested.unwrap_or_default().to_string();
            log.record(&LogEvent::FileNotExist { file: file.clone() })
                .await;
            return Err(ExchangeError::FileNotExist { file });
        };

        Ok(ExchangeParameters::from_merged(
            &merged,
            exchange_url,
            credentials,
        ))
    }
}
