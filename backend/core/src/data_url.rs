//! `data:` URL helpers for images moving between contexts.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::TruthLensError;

pub const PNG_MIME: &str = "image/png";

/// Encode raw bytes as a base64 `data:` URL.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Accept either a data URL or bare base64 (assumed PNG) and return a data URL.
pub fn ensure_data_url(image_data: &str) -> String {
    let trimmed = image_data.trim();
    if trimmed.starts_with("data:") {
        trimmed.to_string()
    } else {
        format!("data:{};base64,{}", PNG_MIME, trimmed)
    }
}

/// Split a data URL (or bare base64) into its MIME type and decoded bytes.
pub fn decode(image_data: &str) -> Result<(String, Vec<u8>), TruthLensError> {
    let trimmed = image_data.trim();
    let (mime, payload) = match trimmed.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .ok_or_else(|| TruthLensError::Capture("malformed data URL".into()))?;
            let mime = header.strip_suffix(";base64").unwrap_or(header);
            (mime.to_string(), payload)
        }
        None => (PNG_MIME.to_string(), trimmed),
    };
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| TruthLensError::Capture(format!("invalid base64 image: {e}")))?;
    Ok((mime, bytes))
}

/// Guess an image MIME type from a file extension.
pub fn mime_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => PNG_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode() {
        let url = encode("image/jpeg", b"\xff\xd8\xff");
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let (mime, bytes) = decode(&url).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, b"\xff\xd8\xff");
    }

    #[test]
    fn bare_base64_is_treated_as_png() {
        assert_eq!(ensure_data_url("AAAA"), "data:image/png;base64,AAAA");
        let (mime, _) = decode("AAAA").unwrap();
        assert_eq!(mime, PNG_MIME);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(decode("data:image/png;base64").is_err());
        assert!(decode("data:image/png;base64,@@@").is_err());
    }
}
