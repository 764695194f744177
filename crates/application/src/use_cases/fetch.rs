//! Single GET round trip with run-log reporting.

use debug1c_domain::{ExchangeError, LogEvent};
use tracing::debug;
use url::Url;

use crate::ports::{ExchangeTransport, FileSystem};
use crate::run_log::RunLog;

/// Issues one GET and logs a failure before turning it into a run error.
///
/// `label` names the request in the log (its `mode`, or `probe`).
pub(crate) async fn fetch<T, F>(
    transport: &T,
    url: &Url,
    label: &str,
    log: &mut RunLog<F>,
) -> Result<Vec<u8>, ExchangeError>
where
    T: ExchangeTransport,
    F: FileSystem,
{
    debug!(%url, "GET");
    match transport.get(url).await {
        Ok(body) => {
            debug!(mode = label, bytes = body.len(), "Response received");
            Ok(body)
        }
        Err(e) => {
            let message = e.to_string();
            log.record(&LogEvent::RequestFailed {
                mode: label.to_string(),
                message: message.clone(),
            })
            .await;
            Err(ExchangeError::Transport { message })
        }
    }
}
