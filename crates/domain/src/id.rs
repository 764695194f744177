//! ID generation utilities.

use uuid::Uuid;

/// Generates a run id.
///
/// UUID v7 includes timestamp information and is sortable, so run ids in
/// diagnostics line up with log order.
#[must_use]
pub fn generate_run_id() -> String {
    Uuid::now_v7().to_string()
}
