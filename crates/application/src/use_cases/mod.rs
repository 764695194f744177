//! Application use cases (exchange run orchestration).

mod authenticate;
mod connect_transport;
mod exchange_driver;
mod fetch;
mod locate_import;
mod resolve_parameters;
mod run_exchange;

pub use authenticate::Authenticate;
pub use connect_transport::ConnectTransport;
pub use exchange_driver::ExchangeDriver;
pub use locate_import::LocateImportFile;
pub use resolve_parameters::ResolveParameters;
pub use run_exchange::{RunExchange, SilenceRequest};
