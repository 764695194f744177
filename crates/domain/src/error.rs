//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The type/mode payload could not be decoded.
    #[error("invalid type/mode payload: {0}")]
    InvalidTypeMode(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Credential field names, as reported by [`ExchangeError::EmptyParam`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    /// The `LOGIN` field.
    Login,
    /// The `PASSWORD` field.
    Password,
}

impl CredentialField {
    /// Returns the inbound parameter name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::Password => "PASSWORD",
        }
    }
}

impl std::fmt::Display for CredentialField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that end an exchange run.
///
/// None of these are fatal to the process. Each one stops the current run
/// and is reported back to the caller in the [`RunResult`](crate::RunResult).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The type/mode payload is missing or undecodable.
    #[error("exchange mode not selected")]
    ModeNotSelected,

    /// The exchange URL could not be resolved to an existing target.
    #[error("exchange file does not exist: {file}")]
    FileNotExist {
        /// The URL as it was requested (empty when the default was used).
        file: String,
    },

    /// A required credential is empty.
    #[error("empty parameter: {param}")]
    EmptyParam {
        /// The empty field.
        param: CredentialField,
    },

    /// The probe request returned no session cookie.
    #[error("could not create HTTP client: no session cookie returned")]
    HttpClientCreateError,

    /// The check-auth handshake returned no session id.
    #[error("authorization on the exchange endpoint failed")]
    HttpClientAuthError,

    /// The import endpoint kept answering `progress` past the iteration limit.
    #[error("import still in progress after {attempts} requests")]
    MaxRetriesExceeded {
        /// Number of requests issued.
        attempts: u32,
    },

    /// The import endpoint kept answering `progress` past the time limit.
    #[error("import still in progress after {elapsed_ms} ms")]
    Timeout {
        /// Time spent in the import loop.
        elapsed_ms: u64,
    },

    /// A request failed at the network level.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying error text.
        message: String,
    },

    /// The scratch directory could not be prepared.
    #[error("could not prepare scratch directory: {message}")]
    PrepareDir {
        /// Underlying error text.
        message: String,
    },
}

impl ExchangeError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ModeNotSelected => "MODE_NOT_SELECTED",
            Self::FileNotExist { .. } => "FILE_NOT_EXIST",
            Self::EmptyParam { .. } => "EMPTY_PARAM",
            Self::HttpClientCreateError => "HTTP_CLIENT_CREATE_ERROR",
            Self::HttpClientAuthError => "HTTP_CLIENT_AUTH_ERROR",
            Self::MaxRetriesExceeded { .. } => "MAX_RETRIES_EXCEEDED",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::PrepareDir { .. } => "PREPARE_DIR_ERROR",
        }
    }
}
