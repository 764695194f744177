//! Status envelope printed after each command.

use debug1c_domain::RunResult;
use serde::Serialize;

/// Outcome of a command, printed as JSON on stdout.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    status: &'static str,
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorEntry {
    code: &'static str,
    message: String,
}

impl StatusReport {
    /// A report for a failure outside of any run, such as bad settings.
    pub fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: "error",
            errors: vec![ErrorEntry {
                code,
                message: message.into(),
            }],
        }
    }

    /// Whether the command succeeded.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// JSON text of the report.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!(r#"{{"status":"{}"}}"#, self.status))
    }
}

impl From<&RunResult> for StatusReport {
    fn from(result: &RunResult) -> Self {
        let errors: Vec<_> = result
            .errors()
            .iter()
            .map(|e| ErrorEntry {
                code: e.code(),
                message: e.to_string(),
            })
            .collect();

        Self {
            status: if errors.is_empty() { "success" } else { "error" },
            errors,
        }
    }
}
