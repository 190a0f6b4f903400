//! Canvas sizing: fit a named aspect ratio into the available container.

use crate::error::SizingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed padding subtracted from each container axis.
pub const CONTAINER_PADDING: f32 = 40.0;

/// Largest canvas side, in pixels, the editor will size to.
pub const MAX_CANVAS_SIDE: i32 = 16_384;

/// Canvas dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Finite, positive and no side over [`MAX_CANVAS_SIDE`].
    pub fn is_usable(self) -> bool {
        let side_ok = |v: f32| v.is_finite() && v > 0.0 && v <= MAX_CANVAS_SIDE as f32;
        side_ok(self.width) && side_ok(self.height)
    }

    /// Shrink by `padding` on each axis, never below zero.
    pub fn inset(self, padding: f32) -> Self {
        Self {
            width: (self.width - padding).max(0.0),
            height: (self.height - padding).max(0.0),
        }
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(500.0, 500.0)
    }
}

/// A selectable canvas template: a `W:H` ratio or free-form custom size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Template {
    Ratio { w: f32, h: f32 },
    Custom,
}

impl FromStr for Template {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("custom") {
            return Ok(Template::Custom);
        }
        let invalid = || SizingError::InvalidRatio(s.to_string());
        let (w, h) = s.split_once(':').ok_or_else(invalid)?;
        let w: f32 = w.trim().parse().map_err(|_| invalid())?;
        let h: f32 = h.trim().parse().map_err(|_| invalid())?;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(invalid());
        }
        Ok(Template::Ratio { w, h })
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Template::Ratio { w, h } => write!(f, "{w}:{h}"),
            Template::Custom => f.write_str("custom"),
        }
    }
}

/// Largest size with ratio `w:h` that fits inside `bounds`.
///
/// When the container is relatively wider than the ratio, height is capped
/// and width derived; otherwise width is capped and height derived.
pub fn fit_ratio(w: f32, h: f32, bounds: CanvasSize) -> CanvasSize {
    // cw / ch > w / h, cross-multiplied
    if bounds.width * h > bounds.height * w {
        CanvasSize::new(bounds.height * w / h, bounds.height)
    } else {
        CanvasSize::new(bounds.width, bounds.width * h / w)
    }
}

/// Resolve a template against already-padded container `bounds`.
/// `Custom` resolves to `custom_default`.
pub fn template_size(
    template: Template,
    bounds: CanvasSize,
    custom_default: CanvasSize,
) -> CanvasSize {
    match template {
        Template::Ratio { w, h } => fit_ratio(w, h, bounds),
        Template::Custom => custom_default,
    }
}

/// Literal custom size, accepted only when both sides are positive and at
/// most [`MAX_CANVAS_SIDE`].
pub fn custom_size(width: i32, height: i32) -> Option<CanvasSize> {
    let side_ok = |v: i32| (1..=MAX_CANVAS_SIDE).contains(&v);
    (side_ok(width) && side_ok(height)).then(|| CanvasSize::new(width as f32, height as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn square_in_landscape_container_caps_height() {
        let size = fit_ratio(1.0, 1.0, CanvasSize::new(800.0, 600.0));
        assert_eq!(size, CanvasSize::new(600.0, 600.0));
    }

    #[test]
    fn wide_ratio_in_landscape_container_caps_width() {
        let size = fit_ratio(16.0, 9.0, CanvasSize::new(800.0, 600.0));
        assert_eq!(size, CanvasSize::new(800.0, 450.0));
    }

    #[test]
    fn portrait_ratio_derives_width() {
        let size = fit_ratio(3.0, 4.0, CanvasSize::new(800.0, 600.0));
        assert_eq!(size, CanvasSize::new(450.0, 600.0));
    }

    #[test]
    fn parses_templates() {
        assert_eq!("16:9".parse::<Template>().unwrap(), Template::Ratio { w: 16.0, h: 9.0 });
        assert_eq!("custom".parse::<Template>().unwrap(), Template::Custom);
        assert!("16x9".parse::<Template>().is_err());
        assert!("0:1".parse::<Template>().is_err());
    }

    #[test]
    fn custom_template_uses_default() {
        let size = template_size(
            Template::Custom,
            CanvasSize::new(1000.0, 1000.0),
            CanvasSize::default(),
        );
        assert_eq!(size, CanvasSize::new(500.0, 500.0));
    }

    #[test]
    fn custom_size_requires_both_positive() {
        assert_eq!(custom_size(300, 0), None);
        assert_eq!(custom_size(-5, 200), None);
        assert_eq!(custom_size(300, 200), Some(CanvasSize::new(300.0, 200.0)));
    }

    #[test]
    fn custom_size_rejects_oversized_sides() {
        assert_eq!(custom_size(i32::MAX, i32::MAX), None);
        assert_eq!(custom_size(MAX_CANVAS_SIDE + 1, 100), None);
        assert_eq!(
            custom_size(MAX_CANVAS_SIDE, 1),
            Some(CanvasSize::new(MAX_CANVAS_SIDE as f32, 1.0))
        );
    }

    #[test]
    fn usable_sizes_are_finite_and_bounded() {
        assert!(CanvasSize::new(800.0, 450.0).is_usable());
        assert!(!CanvasSize::new(0.0, 450.0).is_usable());
        assert!(!CanvasSize::new(f32::NAN, 450.0).is_usable());
        assert!(!CanvasSize::new(1e9, 450.0).is_usable());
    }

    #[test]
    fn inset_removes_padding() {
        let inner = CanvasSize::new(840.0, 640.0).inset(CONTAINER_PADDING);
        assert_eq!(inner, CanvasSize::new(800.0, 600.0));
    }
}
