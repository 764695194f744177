//! Exchange driver.
//!
//! Authenticates, then runs the flow the (type, mode) pair routes to. Pairs
//! without a route do nothing at all.

use debug1c_domain::{
    EntryPoint, ExchangeError, ExchangeParameters, ExchangeRequest, Flow, LogEvent, Session,
    UploadArea, route,
};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::authenticate::Authenticate;
use super::fetch::fetch;
use super::locate_import::LocateImportFile;
use crate::ports::{ArtifactPath, ExchangeTransport, FileSystem};
use crate::run_log::RunLog;
use crate::services::ExchangeServices;

/// Marker the import endpoint puts in its reply while work remains.
const PROGRESS_MARKER: &str = "progress";

/// Drives one authenticated exchange run over an established transport.
pub struct ExchangeDriver<'a, T, F> {
    services: &'a ExchangeServices<F>,
    params: &'a ExchangeParameters,
    transport: T,
    session: Session,
    log: &'a mut RunLog<F>,
}

impl<'a, T, F> ExchangeDriver<'a, T, F>
where
    T: ExchangeTransport,
    F: FileSystem,
{
    /// Creates a driver for a connected, not yet authenticated transport.
    pub fn new(
        services: &'a ExchangeServices<F>,
        params: &'a ExchangeParameters,
        transport: T,
        session: Session,
        log: &'a mut RunLog<F>,
    ) -> Self {
        Self {
            services,
            params,
            transport,
            session,
            log,
        }
    }

    /// Runs the exchange: start line, check-auth, flow, completion line.
    ///
    /// The completion line is written whatever happened in between.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the run early, if any. Soft conditions
    /// (no import file, unknown order, failed order save) are logged only.
    pub async fn run(mut self, entry: EntryPoint) -> Result<(), ExchangeError> {
        self.log
            .record(&LogEvent::Started {
                entry,
                url: self.params.exchange_url.to_string(),
            })
            .await;

        let outcome = match self.authenticate().await {
            Ok(()) => self.dispatch().await,
            Err(e) => Err(e),
        };

        self.log.record(&LogEvent::Completed).await;
        outcome
    }

    async fn authenticate(&mut self) -> Result<(), ExchangeError> {
        Authenticate::new(
            self.services.decoder.as_ref(),
            &self.services.settings.csrf_header,
        )
        .execute(
            &mut self.transport,
            self.params,
            &mut self.session,
            self.log,
        )
        .await
    }

    async fn dispatch(&mut self) -> Result<(), ExchangeError> {
        let Some(flow) = route(&self.params.exchange_type, &self.params.mode) else {
            debug!(
                exchange_type = %self.params.exchange_type,
                mode = %self.params.mode,
                "No flow for type/mode pair"
            );
            return Ok(());
        };

        info!(?flow, "Running flow");
        match flow {
            Flow::Import(area) => self.import(area).await,
            Flow::InitThenQuery => {
                self.init().await?;
                self.query().await
            }
            Flow::Info => self.info().await,
            Flow::OrderAcknowledge => {
                self.acknowledge_order().await;
                Ok(())
            }
        }
    }

    fn sessid(&self) -> &str {
        self.session.csrf_token().unwrap_or_default()
    }

    async fn get(&mut self, request: &ExchangeRequest) -> Result<Vec<u8>, ExchangeError> {
        let url = request.to_url(&self.params.exchange_url);
        fetch(&self.transport, &url, request.mode(), self.log).await
    }

    async fn get_text(&mut self, request: &ExchangeRequest) -> Result<String, ExchangeError> {
        let body = self.get(request).await?;
        Ok(self.services.decoder.decode(&body))
    }

    /// Uploads the newest XML file of `area`, repeating while the endpoint
    /// reports progress, within the configured limits.
    async fn import(&mut self, area: UploadArea) -> Result<(), ExchangeError> {
        let dir = self.services.site.upload_dir(area);
        let Some(file) = LocateImportFile::new(&self.services.fs)
            .execute(&dir)
            .await
        else {
            self.log.record(&LogEvent::FileNotFound).await;
            return Ok(());
        };

        self.log
            .record(&LogEvent::ImportingFile { file: file.clone() })
            .await;

        let request = ExchangeRequest::import(
            &self.params.exchange_type,
            &self.params.mode,
            self.sessid(),
            &file,
        );
        let limits = self.services.settings.import;
        let started = Instant::now();

        for attempt in 1..=limits.max_iterations {
            let body = self.get_text(&request).await?;
            let in_progress = body.contains(PROGRESS_MARKER);
            self.log.record(&LogEvent::Replace { body }).await;

            if !in_progress {
                debug!(attempt, "Import finished");
                return Ok(());
            }

            let elapsed = started.elapsed();
            if elapsed >= limits.timeout {
                let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                return self.abort_import(ExchangeError::Timeout { elapsed_ms }).await;
            }
        }

        self.abort_import(ExchangeError::MaxRetriesExceeded {
            attempts: limits.max_iterations,
        })
        .await
    }

    async fn abort_import(&mut self, error: ExchangeError) -> Result<(), ExchangeError> {
        warn!(error = %error, "Import loop stopped");
        self.log
            .record(&LogEvent::ImportAborted {
                reason: error.to_string(),
            })
            .await;
        Err(error)
    }

    async fn init(&mut self) -> Result<(), ExchangeError> {
        let request = ExchangeRequest::init(
            &self.params.exchange_type,
            self.sessid(),
            self.params.version.as_deref(),
        );
        let body = self.get_text(&request).await?;

        if !body.is_empty() {
            self.log.record(&LogEvent::InitSuccess).await;
        }
        Ok(())
    }

    async fn query(&mut self) -> Result<(), ExchangeError> {
        let request = ExchangeRequest::query(self.sessid(), self.params.order_id);
        let body = self.get(&request).await?;
        let target = self.services.site.order_file();
        self.save_raw(&target, &body).await;
        Ok(())
    }

    async fn info(&mut self) -> Result<(), ExchangeError> {
        let request = ExchangeRequest::info(self.sessid());
        let body = self.get(&request).await?;
        let target = self.services.site.info_file();
        self.save_raw(&target, &body).await;
        Ok(())
    }

    /// Writes a response body as received, without decoding.
    async fn save_raw(&mut self, target: &ArtifactPath, body: &[u8]) {
        match self.services.fs.write_file(&target.path, body).await {
            Ok(()) => {
                self.log
                    .record(&LogEvent::FileLink {
                        file: target.public.clone(),
                    })
                    .await;
            }
            Err(e) => {
                warn!(path = %target.path.display(), error = %e, "Failed to save response");
                self.log
                    .record(&LogEvent::FileWriteError {
                        file: target.public.clone(),
                        message: e.to_string(),
                    })
                    .await;
            }
        }
    }

    /// Resets the order's acknowledgement flag so the next sale exchange
    /// picks it up again.
    async fn acknowledge_order(&mut self) {
        self.log.record(&LogEvent::SearchingOrder).await;

        let order_id = self.params.order_id;
        let found = match order_id {
            Some(id) => match self.services.orders.load(id).await {
                Ok(order) => order,
                Err(e) => {
                    warn!(order_id = id, error = %e, "Order lookup failed");
                    None
                }
            },
            None => None,
        };

        let Some(mut order) = found else {
            self.log.record(&LogEvent::OrderNotFound { order_id }).await;
            return;
        };

        self.log
            .record(&LogEvent::OrderFound { order_id: order.id })
            .await;

        order.mark_not_updated();
        match self.services.orders.save(&order).await {
            Ok(()) => {
                self.log
                    .record(&LogEvent::OrderMarked { order_id: order.id })
                    .await;
            }
            Err(e) => {
                warn!(order_id = order.id, error = %e, "Order save failed");
                self.log
                    .record(&LogEvent::OrderNotUpdated { order_id: order.id })
                    .await;
            }
        }
    }
}
