//! Caller-visible outcome of one run.

use crate::error::ExchangeError;

/// Success flag plus accumulated errors. Success means no errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    errors: Vec<ExchangeError>,
}

impl RunResult {
    /// Creates an empty (successful) result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an error.
    pub fn add_error(&mut self, error: ExchangeError) {
        self.errors.push(error);
    }

    /// Whether no error was registered.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// The registered errors, in order.
    #[must_use]
    pub fn errors(&self) -> &[ExchangeError] {
        &self.errors
    }
}

impl From<ExchangeError> for RunResult {
    fn from(error: ExchangeError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}
