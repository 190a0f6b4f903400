//! Core scene model for collages.
//!
//! A `Scene` is a canvas (size + background) and an ordered list of
//! objects. Index 0 is the bottom of the stack; the last object paints on
//! top. Every object has a position and a scale; images additionally carry
//! their six filter slots.

use crate::filter::FilterStack;
use crate::id::ObjectId;
use crate::source::ImageSource;
use kurbo::{Point, Rect};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a hex color string as produced by color pickers:
    /// `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| v * 17);
        let long = |i: usize| Some(hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?);

        match bytes.len() {
            3 => Some(Self::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::from_rgba8(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::from_rgba8(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::from_rgba8(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Emit as lowercase `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color {s:?}")))
    }
}

// ─── Objects ─────────────────────────────────────────────────────────────

/// Default text size, matching the canvas library's text default.
pub const DEFAULT_FONT_SIZE: f32 = 40.0;

/// Line-height factor used for text bounds.
pub const TEXT_LINE_HEIGHT: f32 = 1.16;

/// Average glyph advance as a fraction of the font size, for bounds
/// estimates when no font metrics are at hand.
const TEXT_ADVANCE_ESTIMATE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageObject {
    pub source: ImageSource,
    #[serde(default)]
    pub filters: FilterStack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    pub content: String,
    pub font_family: String,
    pub font_size: f32,
    pub fill: Color,
}

/// What an object draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Image(ImageObject),
    Text(TextItem),
}

/// One visual object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneObject {
    pub id: ObjectId,
    pub left: f32,
    pub top: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl SceneObject {
    pub fn image(id: ObjectId, source: ImageSource) -> Self {
        Self::with_kind(
            id,
            ObjectKind::Image(ImageObject {
                source,
                filters: FilterStack::new(),
            }),
        )
    }

    pub fn text(id: ObjectId, item: TextItem) -> Self {
        Self::with_kind(id, ObjectKind::Text(item))
    }

    fn with_kind(id: ObjectId, kind: ObjectKind) -> Self {
        Self {
            id,
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            kind,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }

    /// Filter slots, if this object is an image.
    pub fn filters(&self) -> Option<&FilterStack> {
        match &self.kind {
            ObjectKind::Image(image) => Some(&image.filters),
            ObjectKind::Text(_) => None,
        }
    }

    pub fn filters_mut(&mut self) -> Option<&mut FilterStack> {
        match &mut self.kind {
            ObjectKind::Image(image) => Some(&mut image.filters),
            ObjectKind::Text(_) => None,
        }
    }

    /// Unscaled size. Text size is an estimate from the font size.
    pub fn natural_size(&self) -> (f32, f32) {
        match &self.kind {
            ObjectKind::Image(image) => {
                let (w, h) = image.source.size();
                (w as f32, h as f32)
            }
            ObjectKind::Text(text) => {
                let lines = text.content.lines().count().max(1);
                let longest = text
                    .content
                    .lines()
                    .map(|l| l.chars().count())
                    .max()
                    .unwrap_or(0);
                (
                    longest as f32 * text.font_size * TEXT_ADVANCE_ESTIMATE,
                    lines as f32 * text.font_size * TEXT_LINE_HEIGHT,
                )
            }
        }
    }

    pub fn scaled_size(&self) -> (f32, f32) {
        let (w, h) = self.natural_size();
        (w * self.scale_x, h * self.scale_y)
    }

    /// Uniformly scale so the scaled width equals `width`.
    pub fn scale_to_width(&mut self, width: f32) {
        let (natural_w, _) = self.natural_size();
        if natural_w > 0.0 {
            let scale = width / natural_w;
            self.scale_x = scale;
            self.scale_y = scale;
        }
    }

    /// Move so the scaled bounds are centered on `(x, y)`.
    pub fn center_on(&mut self, x: f32, y: f32) {
        let (w, h) = self.scaled_size();
        self.left = x - w / 2.0;
        self.top = y - h / 2.0;
    }

    /// Axis-aligned bounds in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.scaled_size();
        Rect::new(
            self.left as f64,
            self.top as f64,
            (self.left + w) as f64,
            (self.top + h) as f64,
        )
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(Point::new(x as f64, y as f64))
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

pub const DEFAULT_CANVAS_SIZE: f32 = 500.0;

/// The complete collage: canvas properties and the z-ordered objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: Color,
    /// Bottom to top.
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// An empty canvas of the given size with a white background.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background: Color::WHITE,
            objects: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Add an object on top of the stack.
    pub fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.index_of(id)?;
        Some(self.objects.remove(idx))
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ObjectId> {
        self.objects.iter().map(|o| &o.id)
    }

    /// Swap the object with the one directly above it.
    /// Returns `false` if it is already on top (or missing).
    pub fn bring_forward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx + 1 < self.objects.len() => {
                self.objects.swap(idx, idx + 1);
                true
            }
            _ => false,
        }
    }

    /// Swap the object with the one directly below it.
    /// Returns `false` if it is already at the bottom (or missing).
    pub fn send_backward(&mut self, id: ObjectId) -> bool {
        match self.index_of(id) {
            Some(idx) if idx > 0 => {
                self.objects.swap(idx, idx - 1);
                true
            }
            _ => false,
        }
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> bool {
        if self.width == width && self.height == height {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(n: u64) -> SceneObject {
        SceneObject::text(
            ObjectId::numbered("text", n),
            TextItem {
                content: "Hi".into(),
                font_family: "Arial".into(),
                font_size: DEFAULT_FONT_SIZE,
                fill: Color::BLACK,
            },
        )
    }

    fn order(scene: &Scene) -> Vec<&str> {
        scene.objects.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn hex_colors_roundtrip() {
        let c = Color::from_hex("#ff8000").unwrap();
        assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
        assert_eq!(c.to_hex(), "#ff8000");
        assert_eq!(Color::from_hex("#fff").unwrap().to_hex(), "#ffffff");
        assert_eq!(Color::from_hex("00000080").unwrap().to_hex(), "#00000080");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("#zzzzzz").is_none());
    }

    #[test]
    fn z_order_moves_one_step() {
        let mut scene = Scene::default();
        for n in 1..=3 {
            scene.add(text(n));
        }
        let bottom = ObjectId::numbered("text", 1);
        assert!(scene.bring_forward(bottom));
        assert_eq!(order(&scene), vec!["text_2", "text_1", "text_3"]);
        assert!(scene.send_backward(bottom));
        assert_eq!(order(&scene), vec!["text_1", "text_2", "text_3"]);
    }

    #[test]
    fn z_order_is_bounded() {
        let mut scene = Scene::default();
        scene.add(text(1));
        scene.add(text(2));
        assert!(!scene.send_backward(ObjectId::numbered("text", 1)));
        assert!(!scene.bring_forward(ObjectId::numbered("text", 2)));
        assert!(!scene.bring_forward(ObjectId::numbered("text", 99)));
    }

    #[test]
    fn scale_to_width_is_uniform() {
        let source = ImageSource::new("image/png", vec![0u8], 200, 100);
        let mut obj = SceneObject::image(ObjectId::numbered("image", 1), source);
        obj.scale_to_width(50.0);
        assert_eq!((obj.scale_x, obj.scale_y), (0.25, 0.25));
        assert_eq!(obj.scaled_size(), (50.0, 25.0));

        obj.center_on(100.0, 100.0);
        assert_eq!((obj.left, obj.top), (75.0, 87.5));
        assert!(obj.contains(100.0, 100.0));
        assert!(!obj.contains(10.0, 10.0));
    }
}
