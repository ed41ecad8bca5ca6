use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::file_loader::FileContent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Structured,
    Binary,
}

impl PayloadKind {
    /// Tag the embedded script branches on when decoding the payload.
    pub fn script_tag(self) -> &'static str {
        match self {
            PayloadKind::Structured => "json",
            PayloadKind::Binary => "arraybuffer",
        }
    }
}

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Inverse of [`encode`]; the page does the same with `atob`.
#[cfg(test)]
pub fn decode(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(payload)
}

/// Transport-safe form of a [`FileContent`] handed to the render surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentDescriptor {
    encoded_payload: String,
    payload_kind: PayloadKind,
}

impl ContentDescriptor {
    pub fn empty() -> Self {
        Self {
            encoded_payload: String::new(),
            payload_kind: PayloadKind::Structured,
        }
    }

    pub fn from_content(content: &FileContent) -> Self {
        let payload_kind = if content.is_structured() {
            PayloadKind::Structured
        } else {
            PayloadKind::Binary
        };

        Self {
            encoded_payload: encode(content.bytes()),
            payload_kind,
        }
    }

    /// Absent content (no argument, failed load) still yields a usable descriptor.
    pub fn bridge(content: Option<&FileContent>) -> Self {
        match content {
            Some(c) => Self::from_content(c),
            None => Self::empty(),
        }
    }

    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    pub fn payload_kind(&self) -> PayloadKind {
        self.payload_kind
    }

    pub fn is_empty(&self) -> bool {
        self.encoded_payload.is_empty()
    }

    #[cfg(test)]
    pub fn decoded(&self) -> Result<Vec<u8>, base64::DecodeError> {
        decode(&self.encoded_payload)
    }
}
