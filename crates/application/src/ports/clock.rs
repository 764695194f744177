//! Clock port for time-related operations

use chrono::{DateTime, Local};

/// Port for getting the current time.
///
/// Run log timestamps are local wall-clock time. This abstraction allows
/// testing time-dependent code by providing a mock implementation.
pub trait Clock: Send + Sync {
    /// Returns the current local timestamp.
    fn now(&self) -> DateTime<Local>;
}
