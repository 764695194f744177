//! Legacy codepage decoding for exchange responses.
//!
//! The exchange endpoint answers in a single-byte codepage (windows-1251 by
//! default). Decoding is lossy and never fails.

use debug1c_application::ports::BodyDecoder;
use encoding_rs::{Encoding, WINDOWS_1251};
use tracing::debug;

/// Decodes response bodies from a fixed codepage into UTF-8.
#[derive(Debug, Clone, Copy)]
pub struct CodepageDecoder {
    encoding: &'static Encoding,
}

impl CodepageDecoder {
    /// Creates a decoder for the codepage named by `label`
    /// (e.g. `windows-1251`, `cp1251`, `utf-8`).
    ///
    /// Returns `None` for labels `encoding_rs` does not know.
    #[must_use]
    pub fn for_label(label: &str) -> Option<Self> {
        Encoding::for_label(label.trim().as_bytes()).map(|encoding| Self { encoding })
    }

    /// Name of the codepage.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

impl Default for CodepageDecoder {
    fn default() -> Self {
        Self {
            encoding: WINDOWS_1251,
        }
    }
}

impl BodyDecoder for CodepageDecoder {
    fn decode(&self, body: &[u8]) -> String {
        let (text, had_errors) = self.encoding.decode_without_bom_handling(body);
        if had_errors {
            debug!(codepage = self.name(), "Replaced unmappable bytes in response");
        }
        text.into_owned()
    }
}
