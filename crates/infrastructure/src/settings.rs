//! Application settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (`debug1c.toml` in the working directory, or an explicit path), then
//! environment variables such as `DEBUG1C__TRANSPORT__TIMEOUT_SECS=30`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use debug1c_application::{DebugCookie, DriverSettings, ExchangeServices, ImportLimits};
use serde::Deserialize;
use url::Url;

use crate::adapters::{
    CodepageDecoder, ConfiguredSite, DEFAULT_USER_AGENT, ReqwestTransportFactory, SiteLayout,
    SystemClock,
};
use crate::persistence::{JsonOrderStore, TokioFileSystem};

/// Settings file looked up when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "debug1c.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "DEBUG1C";

/// Error type for settings loading.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The sources could not be read or deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range or malformed.
    #[error("invalid setting {key}: {message}")]
    Invalid {
        /// Dotted key of the offending setting.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Site layout settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// On-disk root the public paths map to.
    pub document_root: PathBuf,
    /// Origin the public paths are served from.
    pub site_url: String,
    /// Exchange script used when none is requested.
    pub default_exchange_path: String,
    /// Public path of the scratch directory.
    pub scratch_dir: String,
    /// Public path of the upload directory.
    pub upload_dir: String,
    /// Order store file, relative to the document root unless absolute.
    pub orders_file: PathBuf,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("."),
            site_url: "http://localhost".to_string(),
            default_exchange_path: "/bitrix/admin/1c_exchange.php".to_string(),
            scratch_dir: "/upload/tmp/debug1c".to_string(),
            upload_dir: "/upload".to_string(),
            orders_file: PathBuf::from("orders.json"),
        }
    }
}

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    /// Codepage of response bodies.
    pub codepage: String,
    /// Session cookie set by the endpoint.
    pub session_cookie: String,
    /// Header carrying the session id.
    pub csrf_header: String,
    /// Debug cookie name.
    pub debug_cookie_name: String,
    /// Debug cookie value; empty disables the cookie.
    pub debug_cookie_value: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        let driver = DriverSettings::default();
        let debug_cookie = driver.debug_cookie.unwrap_or(DebugCookie {
            name: String::new(),
            value: String::new(),
        });

        Self {
            codepage: "windows-1251".to_string(),
            session_cookie: driver.session_cookie,
            csrf_header: driver.csrf_header,
            debug_cookie_name: debug_cookie.name,
            debug_cookie_value: debug_cookie.value,
            timeout_secs: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Import loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Maximum import requests per run.
    pub max_iterations: u32,
    /// Wall-clock limit in seconds.
    pub timeout_secs: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        let limits = ImportLimits::default();
        Self {
            max_iterations: limits.max_iterations,
            timeout_secs: limits.timeout.as_secs(),
        }
    }
}

/// All settings of the debugger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Site layout.
    pub site: SiteSettings,
    /// Transport.
    pub transport: TransportSettings,
    /// Import loop.
    pub import: ImportSettings,
}

impl AppSettings {
    /// Loads and validates settings.
    ///
    /// With `path = None`, [`DEFAULT_CONFIG_FILE`] is read if it exists; an
    /// explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let (file, required) = path.map_or_else(
            || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            |p| (p.to_path_buf(), true),
        );

        let settings: Self = Config::builder()
            .add_source(
                File::from(file.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Checks values the types cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.site_url()?;
        self.decoder()?;

        if self.import.max_iterations == 0 {
            return Err(SettingsError::Invalid {
                key: "import.max_iterations",
                message: "must be at least 1".to_string(),
            });
        }
        if self.transport.timeout_secs == 0 {
            return Err(SettingsError::Invalid {
                key: "transport.timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.transport.session_cookie.is_empty() {
            return Err(SettingsError::Invalid {
                key: "transport.session_cookie",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn site_url(&self) -> Result<Url, SettingsError> {
        Url::parse(&self.site.site_url).map_err(|e| SettingsError::Invalid {
            key: "site.site_url",
            message: e.to_string(),
        })
    }

    /// Site layout for [`crate::ConfiguredSite`].
    ///
    /// # Errors
    ///
    /// Returns an error if `site.site_url` is not an absolute URL.
    pub fn site_layout(&self) -> Result<SiteLayout, SettingsError> {
        Ok(SiteLayout {
            document_root: self.site.document_root.clone(),
            site_url: self.site_url()?,
            default_exchange_path: self.site.default_exchange_path.clone(),
            scratch_dir: self.site.scratch_dir.clone(),
            upload_dir: self.site.upload_dir.clone(),
        })
    }

    /// Location of the order store file.
    #[must_use]
    pub fn orders_path(&self) -> PathBuf {
        self.site.document_root.join(&self.site.orders_file)
    }

    /// Response body decoder.
    ///
    /// # Errors
    ///
    /// Returns an error if the codepage is unknown.
    pub fn decoder(&self) -> Result<CodepageDecoder, SettingsError> {
        CodepageDecoder::for_label(&self.transport.codepage).ok_or_else(|| {
            SettingsError::Invalid {
                key: "transport.codepage",
                message: format!("unknown codepage {:?}", self.transport.codepage),
            }
        })
    }

    /// Transport factory.
    #[must_use]
    pub fn transport_factory(&self) -> ReqwestTransportFactory {
        ReqwestTransportFactory::new(
            Duration::from_secs(self.transport.timeout_secs),
            self.transport.user_agent.clone(),
        )
    }

    /// Protocol knobs for the exchange driver.
    #[must_use]
    pub fn driver_settings(&self) -> DriverSettings {
        let transport = &self.transport;
        let debug_cookie = (!transport.debug_cookie_name.is_empty()
            && !transport.debug_cookie_value.is_empty())
        .then(|| DebugCookie {
            name: transport.debug_cookie_name.clone(),
            value: transport.debug_cookie_value.clone(),
        });

        DriverSettings {
            session_cookie: transport.session_cookie.clone(),
            csrf_header: transport.csrf_header.clone(),
            debug_cookie,
            import: ImportLimits {
                max_iterations: self.import.max_iterations,
                timeout: Duration::from_secs(self.import.timeout_secs),
            },
        }
    }

    /// Wires the real adapters into the services an exchange run needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the site URL or codepage is invalid.
    pub fn exchange_services(&self) -> Result<ExchangeServices<TokioFileSystem>, SettingsError> {
        let fs = TokioFileSystem::new();
        Ok(ExchangeServices {
            fs,
            site: Arc::new(ConfiguredSite::new(fs, self.site_layout()?)),
            orders: Arc::new(JsonOrderStore::new(fs, self.orders_path())),
            decoder: Arc::new(self.decoder()?),
            clock: Arc::new(SystemClock::new()),
            settings: self.driver_settings(),
        })
    }
}
