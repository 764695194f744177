//! Run exchange use case.
//!
//! Entry point for the inbound actions: `init` and `silence` run the
//! exchange, `prepare` makes sure the scratch directory exists.

use debug1c_domain::{
    Credentials, EntryPoint, ExchangeError, RawParameters, RunResult, generate_run_id,
};
use tracing::{Instrument, info, info_span, warn};

use super::connect_transport::ConnectTransport;
use super::exchange_driver::ExchangeDriver;
use super::resolve_parameters::ResolveParameters;
use crate::ports::{FileSystem, TransportFactory};
use crate::run_log::RunLog;
use crate::services::ExchangeServices;

/// Query parameters of the unattended entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SilenceRequest {
    /// `type`; defaults to `catalog`.
    pub exchange_type: Option<String>,
    /// `work`, used as the mode.
    pub work: String,
    /// `exchange`, the exchange URL override.
    pub exchange: Option<String>,
    /// `login`.
    pub login: String,
    /// `password`.
    pub password: String,
}

/// Use case for running exchange sessions against the endpoint.
///
/// Each call builds its own transport, session and run log; nothing is
/// shared between runs except the log file location.
pub struct RunExchange<TF, F> {
    transports: TF,
    services: ExchangeServices<F>,
}

impl<TF, F> RunExchange<TF, F>
where
    TF: TransportFactory,
    F: FileSystem + Clone,
{
    /// Creates a new `RunExchange` use case.
    #[must_use]
    pub const fn new(transports: TF, services: ExchangeServices<F>) -> Self {
        Self {
            transports,
            services,
        }
    }

    /// Shared services.
    #[must_use]
    pub const fn services(&self) -> &ExchangeServices<F> {
        &self.services
    }

    /// Interactive run: `TYPE_MODE` and `EXCHANGE_URL` come from the
    /// request, credentials from the admin context.
    pub async fn init(&self, raw: RawParameters, credentials: Credentials) -> RunResult {
        self.run(EntryPoint::Init, raw, credentials).await
    }

    /// Unattended run from plain query parameters.
    pub async fn silence(&self, request: SilenceRequest) -> RunResult {
        let raw = RawParameters::silence(
            request.exchange_type.as_deref(),
            &request.work,
            request.exchange.as_deref(),
        );
        let credentials = Credentials::new(request.login, request.password);
        self.run(EntryPoint::Silence, raw, credentials).await
    }

    /// Ensures the scratch directory exists.
    pub async fn prepare(&self) -> RunResult {
        let dir = self.services.site.scratch_dir();
        let created = self.services.fs.create_dir_all(&dir).await;

        match created {
            Ok(()) if self.services.fs.is_dir(&dir).await => {
                info!(dir = %dir.display(), "Scratch directory ready");
                RunResult::new()
            }
            Ok(()) => RunResult::from(ExchangeError::PrepareDir {
                message: format!("{} is not a directory", dir.display()),
            }),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "Failed to prepare scratch directory");
                RunResult::from(ExchangeError::PrepareDir {
                    message: e.to_string(),
                })
            }
        }
    }

    async fn run(
        &self,
        entry: EntryPoint,
        raw: RawParameters,
        credentials: Credentials,
    ) -> RunResult {
        let run_id = generate_run_id();
        let span = info_span!("exchange_run", %run_id, entry = entry.as_str());

        async move {
            let mut log = RunLog::open(
                self.services.fs.clone(),
                self.services.clock.clone(),
                self.services.site.log_file().path,
            )
            .await;

            let outcome = self.execute(entry, raw, credentials, &mut log).await;
            let result = outcome.map_or_else(RunResult::from, |()| RunResult::new());

            info!(
                success = result.is_success(),
                lines = log.lines().len(),
                log = %log.path().display(),
                "Exchange run finished"
            );
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        entry: EntryPoint,
        raw: RawParameters,
        credentials: Credentials,
        log: &mut RunLog<F>,
    ) -> Result<(), ExchangeError> {
        let params = ResolveParameters::new(self.services.site.as_ref())
            .execute(raw, credentials, log)
            .await?;

        let (transport, session) =
            ConnectTransport::new(&self.transports, &self.services.settings)
                .execute(&params, log)
                .await?;

        ExchangeDriver::new(&self.services, &params, transport, session, log)
            .run(entry)
            .await
    }
}
