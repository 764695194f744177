//! Run log lines and the messages that go into them.

use std::fmt;

use chrono::NaiveDateTime;

/// Timestamp format of a run log line (`dd.mm.yy HH:MM:SS`).
pub const LOG_TIMESTAMP_FORMAT: &str = "%d.%m.%y %H:%M:%S";

/// Formats one run log line, including the trailing newline.
///
/// Line breaks inside the message are collapsed to single spaces so that
/// every entry occupies exactly one line.
#[must_use]
pub fn format_log_line(timestamp: NaiveDateTime, message: &str) -> String {
    format!(
        "{}: {}\n",
        timestamp.format(LOG_TIMESTAMP_FORMAT),
        collapse_line_breaks(message)
    )
}

fn collapse_line_breaks(message: &str) -> String {
    message.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

/// Inbound entry point a run was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    /// Interactive run from the admin screen.
    Init,
    /// Unattended run from query parameters.
    Silence,
}

impl EntryPoint {
    /// Name used in the log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Silence => "silence",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a run can write to its log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// The run started.
    Started {
        /// Entry point.
        entry: EntryPoint,
        /// Resolved endpoint.
        url: String,
    },
    /// The run finished.
    Completed,
    /// The type/mode payload is missing or undecodable.
    ModeNotSelected,
    /// The exchange URL did not resolve.
    FileNotExist {
        /// Requested URL.
        file: String,
    },
    /// A credential is empty.
    EmptyParam {
        /// Field name.
        param: String,
    },
    /// The probe request returned no session cookie.
    HttpClientCreateError,
    /// A request failed at the network level.
    RequestFailed {
        /// Request mode.
        mode: String,
        /// Underlying error text.
        message: String,
    },
    /// Check-auth returned a session id.
    AuthSuccess,
    /// Check-auth returned no session id.
    AuthError,
    /// `mode=init` returned a body.
    InitSuccess,
    /// No XML file in the upload area.
    FileNotFound,
    /// An import file was picked.
    ImportingFile {
        /// File name.
        file: String,
    },
    /// Decoded import response.
    Replace {
        /// Response body.
        body: String,
    },
    /// The import loop gave up.
    ImportAborted {
        /// Reason.
        reason: String,
    },
    /// A response was saved to disk.
    FileLink {
        /// Public path of the saved file.
        file: String,
    },
    /// A response could not be saved.
    FileWriteError {
        /// Public path of the file.
        file: String,
        /// Underlying error text.
        message: String,
    },
    /// Order lookup started.
    SearchingOrder,
    /// Order lookup succeeded.
    OrderFound {
        /// Order id.
        order_id: u64,
    },
    /// Order lookup failed.
    OrderNotFound {
        /// Order id, if a valid one was given.
        order_id: Option<u64>,
    },
    /// The acknowledgement flag was reset and saved.
    OrderMarked {
        /// Order id.
        order_id: u64,
    },
    /// Saving the order failed.
    OrderNotUpdated {
        /// Order id.
        order_id: u64,
    },
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { entry, url } => {
                write!(f, "Mode:  {entry}||Exchange started: {url}")
            }
            Self::Completed => f.write_str("Exchange completed"),
            Self::ModeNotSelected => f.write_str("Exchange mode not selected"),
            Self::FileNotExist { file } => write!(f, "Exchange file {file} does not exist"),
            Self::EmptyParam { param } => write!(f, "Parameter {param} is empty"),
            Self::HttpClientCreateError => {
                f.write_str("Could not create HTTP client: no session cookie")
            }
            Self::RequestFailed { mode, message } => {
                write!(f, "Request mode={mode} failed: {message}")
            }
            Self::AuthSuccess => f.write_str("Authorization succeeded"),
            Self::AuthError => f.write_str("Authorization failed"),
            Self::InitSuccess => f.write_str("Initialization succeeded"),
            Self::FileNotFound => f.write_str("File not found"),
            Self::ImportingFile { file } => write!(f, "Importing file {file}"),
            Self::Replace { body } => write!(f, "Response: {body}"),
            Self::ImportAborted { reason } => write!(f, "Import aborted: {reason}"),
            Self::FileLink { file } => write!(f, "File saved: {file}"),
            Self::FileWriteError { file, message } => {
                write!(f, "Could not save {file}: {message}")
            }
            Self::SearchingOrder => f.write_str("Searching order"),
            Self::OrderFound { order_id } => write!(f, "Order {order_id} found"),
            Self::OrderNotFound { order_id } => match order_id {
                Some(id) => write!(f, "Order {id} not found"),
                None => f.write_str("Order not found"),
            },
            Self::OrderMarked { order_id } => {
                write!(f, "Order {order_id} marked for exchange")
            }
            Self::OrderNotUpdated { order_id } => write!(f, "Order {order_id} was not updated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 2))
            .expect("valid timestamp")
    }

    #[test]
    fn test_format_log_line() {
        assert_eq!(
            format_log_line(timestamp(), "Exchange completed"),
            "07.03.24 09:05:02: Exchange completed\n"
        );
    }

    #[test]
    fn test_format_log_line_collapses_line_breaks() {
        let line = format_log_line(timestamp(), "Response: success\nprogress\r\ndone\rend");
        assert_eq!(line, "07.03.24 09:05:02: Response: success progress done end\n");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_event_text() {
        assert_eq!(
            LogEvent::Started {
                entry: EntryPoint::Silence,
                url: "http://shop.local/exchange.php".to_string()
            }
            .to_string(),
            "Mode:  silence||Exchange started: http://shop.local/exchange.php"
        );
        assert_eq!(
            LogEvent::OrderNotFound { order_id: None }.to_string(),
            "Order not found"
        );
        assert_eq!(
            LogEvent::OrderNotFound { order_id: Some(3) }.to_string(),
            "Order 3 not found"
        );
    }
}
