//! Collaborators shared by every step of an exchange run.

use std::sync::Arc;

use crate::ports::{BodyDecoder, Clock, ExchangeSite, OrderStore};
use crate::settings::DriverSettings;

/// Ports and settings an exchange run works with.
///
/// Built once by the caller and borrowed by each run; nothing in here is
/// mutated by a run.
pub struct ExchangeServices<F> {
    /// File system used for the run log, the locator and saved responses.
    pub fs: F,
    /// Site collaborator.
    pub site: Arc<dyn ExchangeSite>,
    /// Order store used by the acknowledgement flow.
    pub orders: Arc<dyn OrderStore>,
    /// Legacy codepage decoder.
    pub decoder: Arc<dyn BodyDecoder>,
    /// Clock for log timestamps.
    pub clock: Arc<dyn Clock>,
    /// Protocol knobs.
    pub settings: DriverSettings,
}
