//! Debug1C Domain - Core exchange types
//!
//! This crate defines the vocabulary of the 1C exchange protocol as the
//! debugger drives it. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod exchange;
pub mod id;
pub mod log;
pub mod order;
pub mod params;
pub mod request;
pub mod run;
pub mod session;

pub use error::{CredentialField, DomainError, DomainResult, ExchangeError};
pub use exchange::{ExchangeMode, ExchangeType, Flow, UploadArea, route};
pub use id::generate_run_id;
pub use log::{EntryPoint, LOG_TIMESTAMP_FORMAT, LogEvent, format_log_line};
pub use order::{NOT_UPDATED, Order, UPDATED_1C_FIELD};
pub use params::{
    Credentials, EXCHANGE_URL_KEY, ExchangeParameters, RawParameters, TYPE_MODE_KEY,
    decode_html_entities,
};
pub use request::ExchangeRequest;
pub use run::RunResult;
pub use session::{Session, extract_sessid};
