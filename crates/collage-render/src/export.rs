//! Encoded exports: file download (PNG or JPEG) and clipboard PNG.

use crate::error::RenderError;
use crate::raster::Rasterizer;
use collage_core::model::{Color, Scene};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, RgbaImage};
use std::fmt;
use std::str::FromStr;

pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }

    /// Suggested download name, e.g. `collage.png`.
    pub fn file_name(self) -> String {
        format!("collage.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" | "image/png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" | "image/jpeg" => Ok(ExportFormat::Jpeg),
            other => Err(RenderError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encode rendered pixels. JPEG has no alpha, so translucent pixels are
/// flattened onto `matte` first.
pub fn encode(
    pixels: &RgbaImage,
    format: ExportFormat,
    matte: Color,
) -> Result<Vec<u8>, RenderError> {
    let mut out = Vec::new();
    let (w, h) = pixels.dimensions();
    match format {
        ExportFormat::Png => PngEncoder::new(&mut out)
            .write_image(pixels.as_raw(), w, h, ExtendedColorType::Rgba8)
            .map_err(RenderError::Encode)?,
        ExportFormat::Jpeg => {
            let flat = flatten(pixels, matte);
            JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY)
                .write_image(flat.as_raw(), w, h, ExtendedColorType::Rgb8)
                .map_err(RenderError::Encode)?
        }
    }
    log::debug!("encoded {w}x{h} {format} ({} bytes)", out.len());
    Ok(out)
}

fn flatten(pixels: &RgbaImage, matte: Color) -> RgbImage {
    let [mr, mg, mb, _] = matte.to_rgba8();
    let matte = [mr, mg, mb];
    RgbImage::from_fn(pixels.width(), pixels.height(), |x, y| {
        let [r, g, b, a] = pixels.get_pixel(x, y).0;
        let alpha = a as f32 / 255.0;
        let mix = |c: u8, m: u8| (c as f32 * alpha + m as f32 * (1.0 - alpha)).round() as u8;
        Rgb([mix(r, matte[0]), mix(g, matte[1]), mix(b, matte[2])])
    })
}

/// Outcome of the host's clipboard write, turned into the user-facing
/// message.
pub fn clipboard_message(result: Result<(), &str>) -> String {
    match result {
        Ok(()) => {
            log::info!("collage copied to clipboard");
            "Image copied to clipboard!".to_string()
        }
        Err(reason) => {
            log::error!("could not copy image: {reason}");
            format!("Could not copy image: {reason}")
        }
    }
}

impl Rasterizer {
    /// Render `scene` and encode it for download.
    pub fn export(&mut self, scene: &Scene, format: ExportFormat) -> Result<Vec<u8>, RenderError> {
        let pixels = self.render(scene)?;
        let matte = if scene.background.a < 1.0 {
            Color::WHITE
        } else {
            scene.background
        };
        encode(&pixels, format, matte)
    }

    /// Render `scene` as PNG bytes for the clipboard.
    pub fn clipboard_png(&mut self, scene: &Scene) -> Result<Vec<u8>, RenderError> {
        self.export(scene, ExportFormat::Png)
    }
}
