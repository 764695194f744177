//! Authentication state for one exchange run.

const SESSID_MARKER: &str = "sessid=";

/// Extracts the session id from a check-auth response body.
///
/// The endpoint's reply is unstructured text. The id is whatever follows the
/// first literal `sessid=` that is not immediately followed by a double quote,
/// up to the end of that line. A trailing carriage return is dropped.
///
/// Returns `None` when there is no such occurrence or the capture is empty.
#[must_use]
pub fn extract_sessid(body: &str) -> Option<&str> {
    body.match_indices(SESSID_MARKER)
        .map(|(start, marker)| &body[start + marker.len()..])
        .find(|rest| !rest.starts_with('"'))
        .map(|rest| rest.split('\n').next().unwrap_or_default())
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|value| !value.is_empty())
}

/// Ephemeral authentication state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    cookie_session_id: Option<String>,
    csrf_token: Option<String>,
}

impl Session {
    /// Creates an unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the session cookie harvested by the probe request.
    pub fn set_cookie_session_id(&mut self, id: impl Into<String>) {
        self.cookie_session_id = Some(id.into());
    }

    /// Marks the session authenticated with the given token.
    pub fn authenticate(&mut self, csrf_token: impl Into<String>) {
        self.csrf_token = Some(csrf_token.into());
    }

    /// The harvested session cookie, if any.
    #[must_use]
    pub fn cookie_session_id(&self) -> Option<&str> {
        self.cookie_session_id.as_deref()
    }

    /// The CSRF token, once authenticated.
    #[must_use]
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Whether the check-auth handshake succeeded.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.csrf_token.is_some()
    }
}
