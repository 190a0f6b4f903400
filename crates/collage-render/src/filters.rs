//! Pixel implementations of the six filter slots.
//!
//! Filters run in slot order on the already-scaled object pixels. Alpha is
//! never touched.

use collage_core::filter::{Filter, FilterStack};
use image::{Rgba, RgbaImage, imageops};

/// Blur sigma at `blur = 1.0`, as a fraction of the image's larger side.
const BLUR_SIGMA_FRACTION: f32 = 0.05;

/// Apply every active slot of `stack` to `pixels` in place.
pub fn apply_filters(pixels: &mut RgbaImage, stack: &FilterStack) {
    let extent = pixels.width().max(pixels.height()) as f32;
    apply_filters_for(pixels, stack, extent);
}

/// Like [`apply_filters`], for `pixels` cut from an object whose longer
/// drawn side is `extent`. Blur radius follows the whole object.
pub fn apply_filters_for(pixels: &mut RgbaImage, stack: &FilterStack, extent: f32) {
    for filter in stack.active() {
        log::trace!("FILTER {filter:?} on {}x{}", pixels.width(), pixels.height());
        match filter {
            Filter::Grayscale => map_rgb(pixels, grayscale),
            Filter::Sepia => map_rgb(pixels, sepia),
            Filter::Blur { blur } => blur_in_place(pixels, blur, extent),
            Filter::Brightness { brightness } => {
                let delta = brightness * 255.0;
                map_rgb(pixels, |[r, g, b]| [r + delta, g + delta, b + delta]);
            }
            Filter::Contrast { contrast } => {
                let c = contrast * 255.0;
                let factor = 259.0 * (c + 255.0) / (255.0 * (259.0 - c));
                let adjust = |v: f32| factor * (v - 128.0) + 128.0;
                map_rgb(pixels, |[r, g, b]| [adjust(r), adjust(g), adjust(b)]);
            }
            Filter::Saturation { saturation } => {
                let adjust = -saturation;
                map_rgb(pixels, |[r, g, b]| {
                    let max = r.max(g).max(b);
                    let push = |v: f32| if v != max { v + (max - v) * adjust } else { v };
                    [push(r), push(g), push(b)]
                });
            }
        }
    }
}

fn grayscale([r, g, b]: [f32; 3]) -> [f32; 3] {
    let avg = (r + g + b) / 3.0;
    [avg, avg, avg]
}

fn sepia([r, g, b]: [f32; 3]) -> [f32; 3] {
    [
        0.393 * r + 0.769 * g + 0.189 * b,
        0.349 * r + 0.686 * g + 0.168 * b,
        0.272 * r + 0.534 * g + 0.131 * b,
    ]
}

fn map_rgb(pixels: &mut RgbaImage, f: impl Fn([f32; 3]) -> [f32; 3]) {
    for Rgba([r, g, b, _]) in pixels.pixels_mut() {
        let [nr, ng, nb] = f([*r as f32, *g as f32, *b as f32]);
        *r = quantize(nr);
        *g = quantize(ng);
        *b = quantize(nb);
    }
}

fn quantize(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn blur_in_place(pixels: &mut RgbaImage, blur: f32, extent: f32) {
    let sigma = blur * extent * BLUR_SIGMA_FRACTION;
    if sigma > 0.0 {
        *pixels = imageops::blur(&*pixels, sigma);
    }
}
