//! Adapters for the application ports.

mod codepage_decoder;
mod configured_site;
mod reqwest_client;
mod system_clock;

pub use codepage_decoder::CodepageDecoder;
pub use configured_site::{ConfiguredSite, SiteLayout};
pub use reqwest_client::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, ReqwestTransport, ReqwestTransportFactory,
};
pub use system_clock::SystemClock;
