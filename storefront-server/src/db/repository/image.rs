//! Image column helpers
//!
//! Images are stored as BLOB + mime type column pairs and travel over the
//! API as base64.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use shared::models::ImagePayload;

use super::{RepoError, RepoResult};

const DEFAULT_MIME: &str = "application/octet-stream";

/// Decoded image ready to bind into a BLOB column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Decode a base64 payload. Accepts `data:` URLs as well as bare base64.
pub fn decode(payload: &ImagePayload) -> RepoResult<ImageBlob> {
    let (data, mime_from_url) = match payload.data.strip_prefix("data:") {
        Some(rest) => {
            let (meta, data) = rest
                .split_once(',')
                .ok_or_else(|| RepoError::Validation("Malformed data URL".into()))?;
            let mime = meta.strip_suffix(";base64").unwrap_or(meta);
            (data, Some(mime.to_string()))
        }
        None => (payload.data.as_str(), None),
    };

    let bytes = STANDARD
        .decode(data.trim())
        .map_err(|e| RepoError::Validation(format!("Invalid base64 image: {e}")))?;
    if bytes.is_empty() {
        return Err(RepoError::Validation("Image is empty".into()));
    }

    let mime_type = if payload.mime_type.is_empty() {
        mime_from_url.unwrap_or_else(|| DEFAULT_MIME.to_string())
    } else {
        payload.mime_type.clone()
    };

    Ok(ImageBlob { bytes, mime_type })
}

pub fn decode_opt(payload: Option<&ImagePayload>) -> RepoResult<Option<ImageBlob>> {
    payload.map(decode).transpose()
}

/// Build the API payload from a BLOB column pair
pub fn encode(bytes: Option<Vec<u8>>, mime_type: Option<String>) -> Option<ImagePayload> {
    bytes.filter(|b| !b.is_empty()).map(|b| ImagePayload {
        data: STANDARD.encode(b),
        mime_type: mime_type.unwrap_or_else(|| DEFAULT_MIME.to_string()),
    })
}

/// Render a BLOB column pair as a `data:` URL
pub fn data_url(bytes: Option<Vec<u8>>, mime_type: Option<String>) -> Option<String> {
    encode(bytes, mime_type).map(|img| format!("data:{};base64,{}", img.mime_type, img.data))
}
