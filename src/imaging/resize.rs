use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Fit `width`x`height` inside a `max_edge` square, keeping the aspect ratio.
///
/// Images already inside the bound keep their size. The scaled edge is
/// rounded to the nearest pixel and never drops below one.
pub fn target_dimensions(width: u32, height: u32, max_edge: u32) -> Dimensions {
    if width > height {
        if width > max_edge {
            return Dimensions::new(max_edge, scale(height, max_edge, width));
        }
    } else if height > max_edge {
        return Dimensions::new(scale(width, max_edge, height), max_edge);
    }
    Dimensions::new(width, height)
}

// edge * numerator / denominator, rounded, at least 1
fn scale(edge: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (edge as f64 * numerator as f64 / denominator as f64).round() as u32;
    scaled.max(1)
}

/// Resample `image` to exactly `target`, as RGBA.
pub fn resize_to(image: &DynamicImage, target: Dimensions) -> RgbaImage {
    if image.width() == target.width && image.height() == target.height {
        return image.to_rgba8();
    }
    image
        .resize_exact(target.width, target.height, FilterType::Triangle)
        .to_rgba8()
}
