//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use debug1c_application::SilenceRequest;
use debug1c_domain::{Credentials, EXCHANGE_URL_KEY, RawParameters, TYPE_MODE_KEY};

/// Drive a 1C exchange session against a site's exchange endpoint.
#[derive(Debug, Parser)]
#[command(name = "debug1c")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Settings file (defaults to ./debug1c.toml when present)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Inbound actions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an exchange from a JSON type/mode payload (interactive mode)
    Init(InitArgs),

    /// Run an exchange from plain parameters (unattended mode)
    Silence(SilenceArgs),

    /// Create the scratch directory for logs and saved responses
    Prepare,
}

/// Arguments of `init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Type/mode payload, e.g. {"TYPE":"sale","MODE":"query","ORDER_ID":42}.
    /// May be HTML-entity-escaped.
    #[arg(long = "type-mode", value_name = "JSON")]
    pub type_mode: String,

    /// Exchange script, as a site path or absolute URL
    #[arg(long = "exchange-url", value_name = "URL")]
    pub exchange_url: Option<String>,

    /// Endpoint login
    #[arg(long, env = "DEBUG1C_LOGIN", default_value = "")]
    pub login: String,

    /// Endpoint password
    #[arg(long, env = "DEBUG1C_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,
}

impl InitArgs {
    /// Inbound parameters and credentials of the run.
    pub fn into_request(self) -> (RawParameters, Credentials) {
        let mut raw = RawParameters::new().with(TYPE_MODE_KEY, self.type_mode);
        if let Some(url) = self.exchange_url {
            raw.insert(EXCHANGE_URL_KEY, url);
        }
        (raw, Credentials::new(self.login, self.password))
    }
}

/// Arguments of `silence`.
#[derive(Debug, Args)]
pub struct SilenceArgs {
    /// Exchange type: catalog, sale or reference (default: catalog)
    #[arg(long = "type", value_name = "TYPE")]
    pub exchange_type: Option<String>,

    /// Exchange mode, e.g. import, query, info, exchange-order
    #[arg(long, value_name = "MODE", default_value = "")]
    pub work: String,

    /// Exchange script, as a site path or absolute URL
    #[arg(long, value_name = "URL")]
    pub exchange: Option<String>,

    /// Endpoint login
    #[arg(long, default_value = "")]
    pub login: String,

    /// Endpoint password
    #[arg(long, default_value = "")]
    pub password: String,
}

impl From<SilenceArgs> for SilenceRequest {
    fn from(args: SilenceArgs) -> Self {
        Self {
            exchange_type: args.exchange_type,
            work: args.work,
            exchange: args.exchange,
            login: args.login,
            password: args.password,
        }
    }
}
