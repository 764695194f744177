//! Debug1C Application Layer
//!
//! Orchestrates exchange runs against a 1C exchange endpoint: parameter
//! resolution, session setup, check-auth and the flow the request routes
//! to. All I/O goes through the ports in [`ports`].

pub mod ports;
pub mod run_log;
pub mod services;
pub mod settings;
pub mod use_cases;

#[cfg(test)]
mod test_support;

pub use run_log::RunLog;
pub use services::ExchangeServices;
pub use settings::{DebugCookie, DriverSettings, ImportLimits};
pub use use_cases::{RunExchange, SilenceRequest};
