//! Font faces available to the rasterizer, keyed by family name.
//!
//! DejaVu Sans ships inside the crate (`assets/`, Bitstream Vera license)
//! so text renders before the host registers any face.

use crate::error::RenderError;
use ab_glyph::FontArc;
use std::collections::HashMap;

/// Family name of the bundled face.
pub const DEFAULT_FAMILY: &str = "DejaVu Sans";

static DEFAULT_FACE: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Registered font faces. The first registered family doubles as the
/// fallback for text whose family is unknown; [`FontBook::new`] registers
/// the bundled face first.
#[derive(Clone)]
pub struct FontBook {
    faces: HashMap<String, FontArc>,
    fallback: Option<String>,
}

impl FontBook {
    /// A book holding the bundled default face.
    pub fn new() -> Self {
        let mut book = Self::empty();
        match FontArc::try_from_slice(DEFAULT_FACE) {
            Ok(font) => book.insert(DEFAULT_FAMILY, font),
            Err(e) => log::error!("bundled font unreadable: {e}"),
        }
        book
    }

    /// A book with no faces at all. Text is skipped until one is registered.
    pub fn empty() -> Self {
        Self {
            faces: HashMap::new(),
            fallback: None,
        }
    }

    pub fn register(&mut self, family: &str, data: Vec<u8>) -> Result<(), RenderError> {
        let font = FontArc::try_from_vec(data).map_err(|_| RenderError::InvalidFont {
            family: family.to_string(),
        })?;
        self.insert(family, font);
        Ok(())
    }

    fn insert(&mut self, family: &str, font: FontArc) {
        let key = family.to_ascii_lowercase();
        if self.fallback.is_none() {
            self.fallback = Some(key.clone());
        }
        self.faces.insert(key, font);
        log::debug!("registered font family {family:?}");
    }

    /// Face for `family`, or the fallback face.
    pub fn get(&self, family: &str) -> Option<&FontArc> {
        self.faces.get(&family.to_ascii_lowercase()).or_else(|| {
            self.fallback
                .as_ref()
                .and_then(|key| self.faces.get(key))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_font_data() {
        let mut book = FontBook::empty();
        let err = book.register("Broken", vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidFont { .. }));
        assert!(book.is_empty());
        assert!(book.get("Broken").is_none());
    }

    #[test]
    fn bundled_face_backs_unknown_families() {
        let book = FontBook::new();
        assert!(!book.is_empty());
        assert!(book.get("dejavu sans").is_some());
        assert!(book.get("Georgia").is_some());
    }
}
