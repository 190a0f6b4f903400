//! Scene → RGBA pixels.
//!
//! Paints the background, then every object bottom to top: images are
//! decoded (cached across frames), scaled, filtered and alpha-composited;
//! text is drawn glyph by glyph from the registered fonts.

use crate::error::RenderError;
use crate::filters::apply_filters_for;
use crate::fonts::FontBook;
use ab_glyph::{Font as _, ScaleFont as _};
use collage_core::model::{ImageObject, ObjectKind, Scene, SceneObject, TEXT_LINE_HEIGHT, TextItem};
use collage_core::sizing::MAX_CANVAS_SIDE;
use collage_core::source::ImageSource;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Identity of a shared image payload: address and length of its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PayloadKey(usize, usize);

impl PayloadKey {
    fn of(source: &ImageSource) -> Self {
        let bytes = source.bytes();
        PayloadKey(Arc::as_ptr(bytes) as *const u8 as usize, bytes.len())
    }
}

/// Rasterizes scenes, keeping decoded images between calls. The default
/// rasterizer draws text with the bundled face.
#[derive(Default)]
pub struct Rasterizer {
    fonts: FontBook,
    decoded: HashMap<PayloadKey, (Arc<[u8]>, RgbaImage)>,
}

impl Rasterizer {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            decoded: HashMap::new(),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Paint the whole scene at canvas resolution.
    pub fn render(&mut self, scene: &Scene) -> Result<RgbaImage, RenderError> {
        let (width, height) = canvas_pixels(scene);
        if width > MAX_CANVAS_SIDE as u32 || height > MAX_CANVAS_SIDE as u32 {
            return Err(RenderError::CanvasTooLarge { width, height });
        }
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba(scene.background.to_rgba8()));
        let mut live = HashSet::new();

        for obj in &scene.objects {
            match &obj.kind {
                ObjectKind::Image(image) => {
                    live.insert(PayloadKey::of(&image.source));
                    self.draw_image(&mut canvas, obj, image)?;
                }
                ObjectKind::Text(text) => draw_text(&mut canvas, obj, text, &self.fonts),
            }
        }

        self.decoded.retain(|key, _| live.contains(key));
        Ok(canvas)
    }

    fn draw_image(
        &mut self,
        canvas: &mut RgbaImage,
        obj: &SceneObject,
        image: &ImageObject,
    ) -> Result<(), RenderError> {
        let (target_w, target_h) = obj.scaled_size();
        let target_w = target_w.round() as i64;
        let target_h = target_h.round() as i64;
        if target_w <= 0 || target_h <= 0 {
            return Ok(());
        }
        let origin = (obj.left.round() as i64, obj.top.round() as i64);
        let Some(visible) = visible_rect(canvas, origin, (target_w, target_h)) else {
            return Ok(());
        };

        let decoded = match self.decoded.entry(PayloadKey::of(&image.source)) {
            Entry::Occupied(entry) => &entry.into_mut().1,
            Entry::Vacant(entry) => {
                let pixels = decode(obj, &image.source)?;
                // Hold the bytes so the address in the key stays unique.
                &entry.insert((image.source.bytes().clone(), pixels)).1
            }
        };

        if decoded.width() == 0 || decoded.height() == 0 {
            return Ok(());
        }
        // Only the on-canvas part is resampled, so huge scales stay cheap.
        let (sx, sy, sw, sh) = visible.source_rect(decoded.dimensions(), (target_w, target_h));
        let (vw, vh) = (visible.width(), visible.height());
        let mut pixels = if (sx, sy, sw, sh) == (0, 0, decoded.width(), decoded.height()) {
            if decoded.dimensions() == (vw, vh) {
                decoded.clone()
            } else {
                imageops::resize(decoded, vw, vh, FilterType::Triangle)
            }
        } else {
            let part = imageops::crop_imm(decoded, sx, sy, sw, sh).to_image();
            if part.dimensions() == (vw, vh) {
                part
            } else {
                imageops::resize(&part, vw, vh, FilterType::Triangle)
            }
        };
        apply_filters_for(&mut pixels, &image.filters, target_w.max(target_h) as f32);

        log::trace!(
            "IMAGE {} {}x{} at ({}, {}), {}x{} visible",
            obj.id,
            target_w,
            target_h,
            obj.left,
            obj.top,
            vw,
            vh
        );
        imageops::overlay(canvas, &pixels, visible.x0, visible.y0);
        Ok(())
    }
}

/// Canvas-space pixel rect of the part of an object that lands on the
/// canvas. `x0 < x1` and `y0 < y1` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibleRect {
    /// Drawn origin of the whole object, possibly off canvas.
    origin: (i64, i64),
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl VisibleRect {
    fn width(&self) -> u32 {
        (self.x1 - self.x0) as u32
    }

    fn height(&self) -> u32 {
        (self.y1 - self.y0) as u32
    }

    /// Sub-rect `(x, y, w, h)` of a `source`-sized image that maps onto
    /// this rect when the whole image is drawn at `target` size.
    fn source_rect(&self, source: (u32, u32), target: (i64, i64)) -> (u32, u32, u32, u32) {
        let axis = |lo: i64, hi: i64, origin: i64, src: u32, target: i64| {
            let ratio = src as f64 / target as f64;
            let start = (((lo as f64 - origin as f64) * ratio).floor() as u32).min(src - 1);
            let end = (((hi as f64 - origin as f64) * ratio).ceil() as u32).clamp(start + 1, src);
            (start, end - start)
        };
        let (x, w) = axis(self.x0, self.x1, self.origin.0, source.0, target.0);
        let (y, h) = axis(self.y0, self.y1, self.origin.1, source.1, target.1);
        (x, y, w, h)
    }
}

fn visible_rect(canvas: &RgbaImage, origin: (i64, i64), size: (i64, i64)) -> Option<VisibleRect> {
    let x0 = origin.0.max(0);
    let y0 = origin.1.max(0);
    let x1 = origin.0.saturating_add(size.0).min(canvas.width() as i64);
    let y1 = origin.1.saturating_add(size.1).min(canvas.height() as i64);
    (x0 < x1 && y0 < y1).then_some(VisibleRect {
        origin,
        x0,
        y0,
        x1,
        y1,
    })
}

/// Canvas size in whole pixels, at least 1×1.
pub fn canvas_pixels(scene: &Scene) -> (u32, u32) {
    let px = |v: f32| v.round().max(1.0) as u32;
    (px(scene.width), px(scene.height))
}

fn decode(obj: &SceneObject, source: &ImageSource) -> Result<RgbaImage, RenderError> {
    let image = image::load_from_memory(source.bytes()).map_err(|source| RenderError::Decode {
        id: obj.id.to_string(),
        source,
    })?;
    Ok(image.to_rgba8())
}

fn draw_text(canvas: &mut RgbaImage, obj: &SceneObject, text: &TextItem, fonts: &FontBook) {
    let Some(font) = fonts.get(&text.font_family) else {
        log::warn!("no font registered for {:?}; skipping {}", text.font_family, obj.id);
        return;
    };

    let scale = ab_glyph::PxScale {
        x: text.font_size * obj.scale_x,
        y: text.font_size * obj.scale_y,
    };
    let scaled = font.as_scaled(scale);
    let line_height = scale.y * TEXT_LINE_HEIGHT;
    let [r, g, b, a] = text.fill.to_rgba8();
    let alpha = a as f32 / 255.0;

    log::trace!("TEXT {} {:?} at ({}, {})", obj.id, text.content, obj.left, obj.top);

    for (line_no, line) in text.content.lines().enumerate() {
        let baseline = obj.top + line_no as f32 * line_height + scaled.ascent();
        let mut caret = obj.left;
        let mut prev = None;
        for ch in line.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = bounds.min.x as i64 + px as i64;
                let y = bounds.min.y as i64 + py as i64;
                blend(canvas, x, y, [r, g, b], alpha * coverage);
            });
        }
    }
}

/// Source-over blend of one color at `opacity` into the canvas.
fn blend(canvas: &mut RgbaImage, x: i64, y: i64, rgb: [u8; 3], opacity: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity == 0.0 {
        return;
    }
    let Rgba(dst) = canvas.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = opacity + dst_a * (1.0 - opacity);
    for c in 0..3 {
        let src = rgb[c] as f32;
        let below = dst[c] as f32;
        let v = (src * opacity + below * dst_a * (1.0 - opacity)) / out_a;
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_full_opacity_replaces_pixel() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        blend(&mut canvas, 1, 1, [10, 20, 30], 1.0);
        assert_eq!(canvas.get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn blend_half_opacity_mixes() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        blend(&mut canvas, 0, 0, [200, 100, 50], 0.5);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([100, 50, 25, 255]));
    }

    #[test]
    fn blend_outside_canvas_is_ignored() {
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]));
        blend(&mut canvas, -1, 0, [255, 255, 255], 1.0);
        blend(&mut canvas, 0, 5, [255, 255, 255], 1.0);
        assert_eq!(canvas.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn visible_rect_clips_to_canvas() {
        let canvas = RgbaImage::new(10, 10);
        let rect = visible_rect(&canvas, (-45, -45), (100, 100)).unwrap();
        assert_eq!((rect.x0, rect.y0, rect.width(), rect.height()), (0, 0, 10, 10));
        assert_eq!(rect.source_rect((100, 100), (100, 100)), (45, 45, 10, 10));
        assert_eq!(rect.source_rect((10, 10), (100, 100)), (4, 4, 2, 2));

        assert_eq!(visible_rect(&canvas, (10, 0), (5, 5)), None);
        assert_eq!(visible_rect(&canvas, (-5, -5), (5, 5)), None);
    }

    #[test]
    fn canvas_pixels_never_zero() {
        let scene = Scene::new(0.0, 10.4);
        assert_eq!(canvas_pixels(&scene), (1, 10));
    }
}
