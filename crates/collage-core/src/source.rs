//! Encoded image payloads embedded in the scene.
//!
//! Bytes are shared behind an `Arc`, so cloning a scene (and therefore
//! taking a snapshot) never copies pixel data. On the wire an image is a
//! self-contained `data:` URL.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "SourceRepr", into = "SourceRepr")]
pub struct ImageSource {
    mime: String,
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl ImageSource {
    pub fn new(
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
            width,
            height,
        }
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Natural (unscaled) pixel size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Split a `data:<mime>;base64,<payload>` URL into mime and raw bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), String> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| "image src is not a data URL".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URL has no payload".to_string())?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| "data URL is not base64-encoded".to_string())?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| format!("bad base64 payload: {e}"))?;
    Ok((mime.to_string(), bytes))
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.mime == other.mime
            && (Arc::ptr_eq(&self.bytes, &other.bytes) || self.bytes == other.bytes)
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSource")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct SourceRepr {
    src: String,
    width: u32,
    height: u32,
}

impl From<ImageSource> for SourceRepr {
    fn from(source: ImageSource) -> Self {
        SourceRepr {
            src: source.to_data_url(),
            width: source.width,
            height: source.height,
        }
    }
}

impl TryFrom<SourceRepr> for ImageSource {
    type Error = String;

    fn try_from(repr: SourceRepr) -> Result<Self, Self::Error> {
        let (mime, bytes) = parse_data_url(&repr.src)?;
        Ok(ImageSource::new(mime, bytes, repr.width, repr.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_carries_mime_and_bytes() {
        let source = ImageSource::new("image/png", vec![1u8, 2, 3, 250], 2, 1);
        let url = source.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));

        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, vec![1u8, 2, 3, 250]);
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(parse_data_url("https://example.com/a.png").is_err());
        assert!(parse_data_url("data:image/png,rawbytes").is_err());
    }

    #[test]
    fn clones_share_bytes() {
        let source = ImageSource::new("image/jpeg", vec![0u8; 64], 8, 8);
        let copy = source.clone();
        assert!(Arc::ptr_eq(source.bytes(), copy.bytes()));
        assert_eq!(source, copy);
    }
}
