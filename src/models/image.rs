use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, StudioError};

/// An encoded image: mime type plus base64 payload.
///
/// The textual form is a data URI, `data:<mime>;base64,<payload>`, which is also
/// how the payload is serialized on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, BASE64.encode(bytes))
    }

    /// Parses `data:<mime>;base64,<payload>`.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let invalid = || StudioError::RequestError("Invalid base64 data URL".into());

        let (header, data) = uri.trim().split_once(',').ok_or_else(invalid)?;
        if data.is_empty() || data.contains(',') {
            return Err(invalid());
        }
        let media = header.strip_prefix("data:").ok_or_else(invalid)?;
        let mime_type = media
            .strip_suffix(";base64")
            .ok_or_else(invalid)?
            .split(';')
            .next()
            .unwrap_or_default();
        if mime_type.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(mime_type, data))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The raw base64 payload, without the data URI header.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| StudioError::ResponseError(format!("image payload is not valid base64: {}", e)))
    }

    /// File extension matching the mime type, `bin` when unknown.
    pub fn file_extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        }
    }
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

impl FromStr for ImagePayload {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_data_uri(s)
    }
}

impl TryFrom<String> for ImagePayload {
    type Error = StudioError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_data_uri(&value)
    }
}

impl From<ImagePayload> for String {
    fn from(value: ImagePayload) -> Self {
        value.to_data_uri()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_uri() {
        let image = ImagePayload::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(image.data(), "iVBORw0KGgo=");
        assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(image.file_extension(), "png");
    }

    #[test]
    fn rejects_malformed_data_uris() {
        for bad in [
            "",
            "iVBORw0KGgo=",
            "data:image/png;base64,",
            "data:;base64,AAAA",
            "image/png;base64,AAAA",
            "data:image/png,AAAA",
            "data:image/png;base64,AA,AA",
        ] {
            assert!(ImagePayload::from_data_uri(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn serializes_as_data_uri_string() {
        let image = ImagePayload::from_bytes("image/jpeg", b"\xff\xd8\xff");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, "\"data:image/jpeg;base64,/9j/\"");

        let back: ImagePayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, image);
        assert_eq!(back.decode().unwrap(), b"\xff\xd8\xff");
    }

    #[test]
    fn deserializing_garbage_fails() {
        assert!(serde_json::from_str::<ImagePayload>("\"not a uri\"").is_err());
    }
}
