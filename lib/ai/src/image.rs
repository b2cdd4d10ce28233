//! Inline image payloads.

use crate::error::LlmError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rootcause::Report;

/// MIME type assumed when the payload carries no data URI header.
const DEFAULT_MIME_TYPE: &str = "image/png";

/// A base64 image ready to be sent inline to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// MIME type, e.g. `image/png`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
    /// Decoded size in bytes.
    pub byte_len: usize,
}

impl ImagePayload {
    /// Parses a `data:<mime>;base64,<data>` URI or a bare base64 string.
    ///
    /// The body is decoded once to check it is valid base64 and not empty.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidImage`] for malformed headers, non-image
    /// MIME types, invalid base64, or an empty body.
    pub fn from_data_uri(input: &str) -> Result<Self, Report<LlmError>> {
        let input = input.trim();
        let (mime_type, data) = match input.strip_prefix("data:") {
            Some(rest) => {
                let (header, data) = rest
                    .split_once(',')
                    .ok_or_else(|| invalid("missing ',' after data URI header"))?;
                let mime_type = header
                    .strip_suffix(";base64")
                    .ok_or_else(|| invalid("data URI is not base64 encoded"))?;
                (mime_type, data)
            }
            None => (DEFAULT_MIME_TYPE, input),
        };

        if !mime_type.starts_with("image/") {
            return Err(invalid(format!("unsupported MIME type '{mime_type}'")));
        }

        let bytes = STANDARD
            .decode(data)
            .map_err(|e| invalid(format!("invalid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(invalid("image is empty"));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
            byte_len: bytes.len(),
        })
    }
}

fn invalid(reason: impl Into<String>) -> Report<LlmError> {
    LlmError::InvalidImage {
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_uri() {
        let image =
            ImagePayload::from_data_uri("data:image/jpeg;base64,aGVsbG8=").expect("valid");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.byte_len, 5);
    }

    #[test]
    fn bare_base64_defaults_to_png() {
        let image = ImagePayload::from_data_uri("aGVsbG8=").expect("valid");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn rejects_bad_payloads() {
        assert!(ImagePayload::from_data_uri("data:image/png;base64").is_err());
        assert!(ImagePayload::from_data_uri("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(ImagePayload::from_data_uri("data:image/png,aGVsbG8=").is_err());
        assert!(ImagePayload::from_data_uri("data:image/png;base64,!!!").is_err());
        assert!(ImagePayload::from_data_uri("data:image/png;base64,").is_err());
    }
}
