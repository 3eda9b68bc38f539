//! Loading user-selected image files as [`ImagePayload`]s.

use std::fs;
use std::path::Path;

use crate::error::{Result, StudioError};
use crate::models::ImagePayload;

pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Sniffs the image type from its leading bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Encodes raw bytes, rejecting anything that is not PNG, JPEG or WebP.
pub fn payload_from_bytes(bytes: &[u8], hint: Option<&Path>) -> Result<ImagePayload> {
    if bytes.is_empty() {
        return Err(StudioError::RequestError("image file is empty".into()));
    }
    let mime = sniff_mime_type(bytes)
        .or_else(|| hint.and_then(mime_from_extension))
        .ok_or_else(|| {
            StudioError::RequestError(format!(
                "unsupported image type, expected one of: {}",
                ACCEPTED_MIME_TYPES.join(", ")
            ))
        })?;
    Ok(ImagePayload::from_bytes(mime, bytes))
}

pub fn load_image(path: impl AsRef<Path>) -> Result<ImagePayload> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        StudioError::RequestError(format!("cannot read image {}: {}", path.display(), e))
    })?;
    let payload = payload_from_bytes(&bytes, Some(path))?;
    log::debug!(
        "Loaded {} ({}, {} bytes)",
        path.display(),
        payload.mime_type(),
        bytes.len()
    );
    Ok(payload)
}

/// `None` in, `None` out; convenient for optional CLI arguments.
pub fn load_optional(path: Option<&Path>) -> Result<Option<ImagePayload>> {
    path.map(load_image).transpose()
}
